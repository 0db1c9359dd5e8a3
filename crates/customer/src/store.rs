use crate::error::StoreError;
use crate::model::{Customer, CustomerFields};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Storage backend for customer rows.
///
/// Implementations must reject a write that would leave two rows with the
/// same `email` by returning [`StoreError::UniqueViolation`].
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Every row, in ascending id (insertion) order.
    async fn list(&self) -> Result<Vec<Customer>, StoreError>;
    /// Point lookup by id.
    async fn get(&self, id: i64) -> Result<Option<Customer>, StoreError>;
    /// Whether any row other than `excluding` holds this exact email.
    async fn email_in_use(&self, email: &str, excluding: Option<i64>) -> Result<bool, StoreError>;
    /// Insert a new row; the store assigns the id.
    async fn insert(&self, fields: &CustomerFields) -> Result<Customer, StoreError>;
    /// Overwrite all writable columns. `None` when the id does not exist.
    async fn update(&self, id: i64, fields: &CustomerFields)
        -> Result<Option<Customer>, StoreError>;
    /// Remove a row. `false` when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Configuration for selecting and building a store.
///
/// # Example
/// ```
/// use customer::StoreConfig;
///
/// // In-memory (for testing)
/// let config = StoreConfig::in_memory();
///
/// // SQLite file, created on first use
/// let config = StoreConfig::sqlite("sqlite://customers.db", 5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StoreConfig {
    /// A SQLite database reachable through `url`.
    Sqlite { url: String, max_connections: u32 },
    /// A process-local map. Contents are lost on exit.
    #[default]
    InMemory,
}

impl StoreConfig {
    /// URL that selects [`StoreConfig::InMemory`] in [`StoreConfig::from_url`].
    pub const IN_MEMORY_URL: &'static str = "memory";

    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    pub fn sqlite<S: Into<String>>(url: S, max_connections: u32) -> Self {
        StoreConfig::Sqlite {
            url: url.into(),
            max_connections,
        }
    }

    /// Pick a backend from a connection string.
    pub fn from_url(url: &str, max_connections: u32) -> Self {
        if url == Self::IN_MEMORY_URL {
            StoreConfig::InMemory
        } else {
            StoreConfig::sqlite(url, max_connections)
        }
    }

    /// Open the configured backend. SQLite stores have their schema
    /// created before this returns.
    pub async fn build(&self) -> Result<Arc<dyn CustomerStore>, StoreError> {
        match self {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryStore::new())),
            StoreConfig::Sqlite {
                url,
                max_connections,
            } => Ok(Arc::new(SqliteStore::connect(url, *max_connections).await?)),
        }
    }
}

#[derive(Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Customer>,
}

impl Rows {
    fn email_owner(&self, email: &str) -> Option<i64> {
        self.by_id
            .values()
            .find(|c| c.email == email)
            .map(|c| c.id)
    }
}

/// An in-memory store using a `RwLock` around a `BTreeMap`.
///
/// Ids start at 1 and are never reused, matching an autoincrement column.
pub struct InMemoryStore {
    rows: RwLock<Rows>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.by_id.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.by_id.get(&id).cloned())
    }

    async fn email_in_use(&self, email: &str, excluding: Option<i64>) -> Result<bool, StoreError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard
            .by_id
            .values()
            .any(|c| c.email == email && Some(c.id) != excluding))
    }

    async fn insert(&self, fields: &CustomerFields) -> Result<Customer, StoreError> {
        // Check and insert under one write lock, like a UNIQUE column would.
        let mut guard = self
            .rows
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        if guard.email_owner(&fields.email).is_some() {
            return Err(StoreError::UniqueViolation("customers.email".into()));
        }
        guard.next_id += 1;
        let customer = fields.clone().into_customer(guard.next_id);
        guard.by_id.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        id: i64,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, StoreError> {
        let mut guard = self
            .rows
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        if !guard.by_id.contains_key(&id) {
            return Ok(None);
        }
        if matches!(guard.email_owner(&fields.email), Some(owner) if owner != id) {
            return Err(StoreError::UniqueViolation("customers.email".into()));
        }
        let customer = fields.clone().into_customer(id);
        guard.by_id.insert(id, customer.clone());
        Ok(Some(customer))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut guard = self
            .rows
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(guard.by_id.remove(&id).is_some())
    }
}

/// The SQLite backend implementation.
pub mod sqlite;

pub use sqlite::SqliteStore;

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str) -> CustomerFields {
        CustomerFields {
            name: name.into(),
            email: email.into(),
            phone: "555-0100".into(),
        }
    }

    #[tokio::test]
    async fn in_memory_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        let a = store.insert(&fields("A", "a@x.com")).await.unwrap();
        let b = store.insert(&fields("B", "b@x.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete(b.id).await.unwrap());
        let c = store.insert(&fields("C", "c@x.com")).await.unwrap();
        assert_eq!(c.id, 3, "ids are not reused");

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[tokio::test]
    async fn in_memory_enforces_unique_email() {
        let store = InMemoryStore::new();
        let a = store.insert(&fields("A", "a@x.com")).await.unwrap();
        let b = store.insert(&fields("B", "b@x.com")).await.unwrap();

        let err = store.insert(&fields("A2", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));

        let err = store.update(b.id, &fields("B", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));

        // Keeping one's own email is not a collision.
        let same = store.update(a.id, &fields("A renamed", "a@x.com")).await.unwrap();
        assert_eq!(same.map(|c| c.name), Some("A renamed".to_string()));
    }

    #[tokio::test]
    async fn in_memory_email_match_is_case_sensitive() {
        let store = InMemoryStore::new();
        let a = store.insert(&fields("A", "a@x.com")).await.unwrap();
        assert!(store.email_in_use("a@x.com", None).await.unwrap());
        assert!(!store.email_in_use("A@X.COM", None).await.unwrap());
        assert!(!store.email_in_use("a@x.com", Some(a.id)).await.unwrap());
    }

    #[tokio::test]
    async fn in_memory_missing_rows() {
        let store = InMemoryStore::new();
        assert_eq!(store.get(7).await.unwrap(), None);
        assert_eq!(store.update(7, &fields("X", "x@x.com")).await.unwrap(), None);
        assert!(!store.delete(7).await.unwrap());
    }

    #[test]
    fn from_url_selects_backend() {
        assert_eq!(StoreConfig::from_url("memory", 5), StoreConfig::InMemory);
        assert_eq!(
            StoreConfig::from_url("sqlite://customers.db", 3),
            StoreConfig::sqlite("sqlite://customers.db", 3)
        );
    }
}
