use crate::config::ServerConfig;
use crate::middleware::keys_match;
use customer::{CustomerService, CustomerStore, StoreError};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Customer operations over the configured store
    pub customers: CustomerService,
}

impl ServerState {
    /// Create server state over an already-open store
    pub fn new(config: ServerConfig, store: Arc<dyn CustomerStore>) -> Self {
        Self {
            config: Arc::new(config),
            customers: CustomerService::new(store),
        }
    }

    /// Open the store named by `config.database_url` and build state on it
    pub async fn connect(config: ServerConfig) -> Result<Self, StoreError> {
        let store = config.store().build().await?;
        Ok(Self::new(config, store))
    }

    /// Check if API key is valid
    pub fn is_valid_api_key(&self, key: &[u8]) -> bool {
        keys_match(self.config.api_key.as_bytes(), key)
    }
}
