//! The customer CRUD operations.
//!
//! Each operation validates input where it has any, issues its reads and one
//! write against the [`CustomerStore`], and returns a typed
//! [`CustomerError`] for every expected failure. Unexpected store failures
//! are logged here with the operation name and id, then surfaced as
//! [`CustomerError::Store`].

use crate::error::{CustomerError, StoreError};
use crate::model::{Customer, CustomerPayload};
use crate::store::CustomerStore;
use crate::validation::validate;
use std::sync::Arc;

/// Request-to-store mapping for customer records.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// Every customer, in store order.
    pub async fn list(&self) -> Result<Vec<Customer>, CustomerError> {
        self.store
            .list()
            .await
            .map_err(|e| internal("list", None, e))
    }

    pub async fn get(&self, id: i64) -> Result<Customer, CustomerError> {
        self.store
            .get(id)
            .await
            .map_err(|e| internal("get", Some(id), e))?
            .ok_or(CustomerError::NotFound(id))
    }

    /// Validate, reject a taken email, then insert.
    pub async fn create(&self, payload: &CustomerPayload) -> Result<Customer, CustomerError> {
        let fields = validate(payload)?;

        let taken = self
            .store
            .email_in_use(&fields.email, None)
            .await
            .map_err(|e| internal("create", None, e))?;
        if taken {
            return Err(CustomerError::EmailTaken);
        }

        let customer = self.store.insert(&fields).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => CustomerError::EmailTaken,
            e => internal("create", None, e),
        })?;

        tracing::info!(id = customer.id, "customer created");
        Ok(customer)
    }

    /// Full replace of name, email and phone.
    ///
    /// Keeping the row's own email is allowed; taking another row's is not.
    pub async fn update(
        &self,
        id: i64,
        payload: &CustomerPayload,
    ) -> Result<Customer, CustomerError> {
        let fields = validate(payload)?;

        if self
            .store
            .get(id)
            .await
            .map_err(|e| internal("update", Some(id), e))?
            .is_none()
        {
            return Err(CustomerError::NotFound(id));
        }

        let taken = self
            .store
            .email_in_use(&fields.email, Some(id))
            .await
            .map_err(|e| internal("update", Some(id), e))?;
        if taken {
            return Err(CustomerError::EmailTakenByOther);
        }

        let updated = self
            .store
            .update(id, &fields)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => CustomerError::EmailTakenByOther,
                e => internal("update", Some(id), e),
            })?
            // Deleted between the lookup and the write.
            .ok_or(CustomerError::NotFound(id))?;

        tracing::info!(id, "customer updated");
        Ok(updated)
    }

    /// Same contract as [`update`](Self::update): all three fields are
    /// replaced, absent ones are validation failures rather than "keep".
    pub async fn partial_update(
        &self,
        id: i64,
        payload: &CustomerPayload,
    ) -> Result<Customer, CustomerError> {
        self.update(id, payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), CustomerError> {
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(|e| internal("delete", Some(id), e))?;
        if !removed {
            return Err(CustomerError::NotFound(id));
        }

        tracing::info!(id, "customer deleted");
        Ok(())
    }
}

fn internal(operation: &'static str, id: Option<i64>, err: StoreError) -> CustomerError {
    tracing::error!(operation, id, error = %err, "customer store failure");
    CustomerError::Store(err)
}
