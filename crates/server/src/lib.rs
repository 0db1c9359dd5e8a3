//! Customer Server - HTTP REST API for customer records
//!
//! This crate exposes the operations of the `customer` crate over HTTP:
//!
//! - **Authentication**: every request must carry `X-API-KEY` matching the
//!   configured secret
//! - **Error Handling**: one fixed table maps each error kind to its status
//! - **Configuration**: file and environment variable based configuration
//! - **Graceful Shutdown**: Ctrl+C and SIGTERM handling
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | `GET` | `/customers` | 200, array of customers |
//! | `GET` | `/customers/{id}` | 200, customer |
//! | `POST` | `/customers` | 201, customer, `Location` header |
//! | `PUT` | `/customers/{id}` | 200, customer |
//! | `PATCH` | `/customers/{id}` | same as `PUT` |
//! | `DELETE` | `/customers/{id}` | 204 |
//!
//! Errors are `{"error": "<message>"}`, except validation failures which are
//! `{"errors": {"<field>": ["<message>", ...]}}`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
