//! Workspace umbrella crate for the customer records service.
//!
//! Re-exports the domain crate ([`customer`]) and the HTTP crate ([`server`])
//! so callers and the end-to-end tests can reach both through one
//! dependency.

pub use customer;
pub use server;

pub use customer::{
    Customer, CustomerError, CustomerFields, CustomerPayload, CustomerService, CustomerStore, InMemoryStore,
    SqliteStore, StoreConfig, StoreError, ValidationErrors, validate,
};
pub use server::{ServerConfig, ServerError, ServerState, build_router, start_server};
