//! Concurrent writers against the customer service.
//!
//! Email uniqueness must hold even when many creates for the same address
//! race: exactly one wins, every other caller sees a conflict.

use customers::{
    CustomerError, CustomerPayload, CustomerService, CustomerStore, InMemoryStore, SqliteStore,
};
use std::collections::HashSet;
use std::sync::Arc;

const WRITERS: usize = 16;

async fn race_same_email(store: Arc<dyn CustomerStore>) {
    let service = CustomerService::new(store);

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create(&CustomerPayload::new(
                        format!("Writer {i}"),
                        "shared@x.com",
                        "555-0100",
                    ))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(_) => created += 1,
            Err(CustomerError::EmailTaken) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, WRITERS - 1);
    assert_eq!(service.list().await.unwrap().len(), 1);
}

async fn distinct_emails_all_succeed(store: Arc<dyn CustomerStore>) {
    let service = CustomerService::new(store);

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create(&CustomerPayload::new(
                        format!("Writer {i}"),
                        format!("writer{i}@x.com"),
                        "555-0100",
                    ))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let customer = handle
            .await
            .expect("task should not panic")
            .expect("distinct emails should not conflict");
        assert!(ids.insert(customer.id), "id {} assigned twice", customer.id);
    }

    assert_eq!(service.list().await.unwrap().len(), WRITERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_email_in_memory() {
    race_same_email(Arc::new(InMemoryStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_email_sqlite() {
    let store = SqliteStore::in_memory().await.unwrap();
    race_same_email(Arc::new(store)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_emails_in_memory() {
    distinct_emails_all_succeed(Arc::new(InMemoryStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_emails_sqlite() {
    let store = SqliteStore::in_memory().await.unwrap();
    distinct_emails_all_succeed(Arc::new(store)).await;
}
