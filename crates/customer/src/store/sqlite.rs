//! SQLite backend for customer storage, built on an `sqlx` connection pool.
//!
//! The `customers` table is created on connect when absent. Email uniqueness
//! is a `UNIQUE` column constraint, so two concurrent writers racing past the
//! service-level check still cannot both commit the same email; the loser
//! gets [`StoreError::UniqueViolation`].
//!
//! # Configuration Example
//! ```toml
//! database_url = "sqlite://customers.db"
//! max_connections = 5
//! ```

use crate::error::StoreError;
use crate::model::{Customer, CustomerFields};
use crate::store::CustomerStore;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS customers (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL
)";

/// SQLite-backed [`CustomerStore`].
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    ///
    /// In-memory URLs get a single connection that is never recycled, since
    /// every SQLite connection to `:memory:` sees its own empty database.
    ///
    /// # Example
    /// ```no_run
    /// use customer::SqliteStore;
    ///
    /// # async fn open() -> Result<(), customer::StoreError> {
    /// let store = SqliteStore::connect("sqlite://customers.db", 5).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// A private, empty in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Wrap an existing pool, creating the `customers` table if absent.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        tracing::debug!("customers table ready");
        Ok(Self { pool })
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl CustomerStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone FROM customers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn email_in_use(&self, email: &str, excluding: Option<i64>) -> Result<bool, StoreError> {
        let owner = match excluding {
            Some(id) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT id FROM customers WHERE email = ? AND id <> ? LIMIT 1",
                )
                .bind(email)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT id FROM customers WHERE email = ? LIMIT 1")
                    .bind(email)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(owner.is_some())
    }

    async fn insert(&self, fields: &CustomerFields) -> Result<Customer, StoreError> {
        let row = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, email, phone) VALUES (?, ?, ?) \
             RETURNING id, name, email, phone",
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>(
            "UPDATE customers SET name = ?, email = ?, phone = ? WHERE id = ? \
             RETURNING id, name, email, phone",
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fields(name: &str, email: &str, phone: &str) -> CustomerFields {
        CustomerFields {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    #[tokio::test]
    async fn test_sqlite_store_crud() {
        let store = SqliteStore::in_memory().await.unwrap();

        let ana = store
            .insert(&fields("Ana", "ana@x.com", "+5512345678"))
            .await
            .unwrap();
        assert_eq!(ana.id, 1);
        assert_eq!(store.get(ana.id).await.unwrap(), Some(ana.clone()));

        let updated = store
            .update(ana.id, &fields("Ana G.", "ana.g@x.com", "555-0100"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, ana.id);
        assert_eq!(updated.name, "Ana G.");
        assert_eq!(store.list().await.unwrap(), vec![updated]);

        assert!(store.delete(ana.id).await.unwrap());
        assert!(!store.delete(ana.id).await.unwrap());
        assert_eq!(store.get(ana.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_store_unique_email() {
        let store = SqliteStore::in_memory().await.unwrap();
        let a = store.insert(&fields("A", "a@x.com", "1")).await.unwrap();
        let b = store.insert(&fields("B", "b@x.com", "2")).await.unwrap();

        let err = store.insert(&fields("C", "a@x.com", "3")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)), "{err:?}");

        let err = store
            .update(b.id, &fields("B", "a@x.com", "2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)), "{err:?}");

        assert!(store.email_in_use("a@x.com", None).await.unwrap());
        assert!(!store.email_in_use("a@x.com", Some(a.id)).await.unwrap());
        assert!(!store.email_in_use("A@X.COM", None).await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sqlite_store_update_missing_row() {
        let store = SqliteStore::in_memory().await.unwrap();
        let result = store.update(42, &fields("X", "x@x.com", "1")).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("customers.db").display());

        let store = SqliteStore::connect(&url, 2).await.unwrap();
        let ana = store
            .insert(&fields("Ana", "ana@x.com", "+5512345678"))
            .await
            .unwrap();
        store.close().await;

        // Reopening runs the schema statement again against an existing table.
        let reopened = SqliteStore::connect(&url, 2).await.unwrap();
        assert_eq!(reopened.get(ana.id).await.unwrap(), Some(ana));
        reopened.close().await;
    }
}
