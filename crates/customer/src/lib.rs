//! Customer records and the operations that manage them.
//!
//! This crate holds everything below the HTTP layer:
//!
//! - **Model**: [`Customer`] rows, the raw [`CustomerPayload`] a caller sends,
//!   and [`CustomerFields`], a payload that passed validation
//! - **Validation**: field-level rules for create/update payloads
//! - **Store**: the [`CustomerStore`] seam with SQLite and in-memory backends
//! - **Service**: [`CustomerService`], which maps each operation onto the store
//!   and enforces email uniqueness and not-found handling
//!
//! # Example
//!
//! ```rust
//! use customer::{CustomerPayload, CustomerService, InMemoryStore};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), customer::CustomerError> {
//! let service = CustomerService::new(Arc::new(InMemoryStore::new()));
//! let created = service
//!     .create(&CustomerPayload::new("Ana", "ana@x.com", "+5512345678"))
//!     .await?;
//! assert_eq!(service.get(created.id).await?, created);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{CustomerError, StoreError};
pub use model::{Customer, CustomerFields, CustomerPayload};
pub use service::CustomerService;
pub use store::{CustomerStore, InMemoryStore, SqliteStore, StoreConfig};
pub use validation::{validate, ValidationErrors, NAME_MAX_CHARS};
