//! API route handlers
//!
//! - `customers`: list, get, create, replace, patch and delete customer records

pub mod customers;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::RouteNotFound
}
