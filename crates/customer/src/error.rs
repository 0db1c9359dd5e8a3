//! Error types produced by the customer crate.
//!
//! | Error | Category | Typical HTTP mapping |
//! |-------|----------|----------------------|
//! | [`Validation`](CustomerError::Validation) | Caller input | 400 |
//! | [`NotFound`](CustomerError::NotFound) | Caller input | 404 |
//! | [`EmailTaken`](CustomerError::EmailTaken) | Conflict | 409 |
//! | [`EmailTakenByOther`](CustomerError::EmailTakenByOther) | Conflict | 409 |
//! | [`Store`](CustomerError::Store) | Internal | 500 |
//!
//! Display strings are the messages returned to API callers. The
//! [`Store`](CustomerError::Store) message carries no backend detail; the
//! underlying [`StoreError`] is reachable through
//! [`std::error::Error::source`] for logging.

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Errors raised by a [`CustomerStore`](crate::CustomerStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write collided with the unique constraint on `email`.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// Any other backend failure (connection, I/O, SQL, poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(db.message().to_string())
            }
            _ => StoreError::backend(err),
        }
    }
}

/// Outcome of a failed [`CustomerService`](crate::CustomerService) operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CustomerError {
    /// One or more field rules failed. Nothing was written.
    #[error("Los datos del cliente no son validos")]
    Validation(ValidationErrors),

    /// No row has the given id.
    #[error("Cliente no encontrado")]
    NotFound(i64),

    /// Create: another customer already uses this email.
    #[error("Ya existe un cliente con ese correo electronico")]
    EmailTaken,

    /// Update: a customer with a different id already uses this email.
    #[error("Ya existe otro cliente con ese correo electronico")]
    EmailTakenByOther,

    /// The store failed unexpectedly.
    #[error("Error interno del servidor")]
    Store(#[source] StoreError),
}

impl From<ValidationErrors> for CustomerError {
    fn from(errors: ValidationErrors) -> Self {
        CustomerError::Validation(errors)
    }
}
