use customer::StoreConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// API key used when none is configured.
pub const DEFAULT_API_KEY: &str = "mi-clave-secreta-123";

/// Server configuration
///
/// Resolved once at startup by [`ServerConfig::load`] and shared read-only
/// through [`ServerState`](crate::ServerState).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Relational store connection string, or `memory` for a process-local store
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound on pooled store connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Secret expected in the `X-API-KEY` header
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Maximum request body size in KB
    #[serde(default = "default_max_body_size_kb")]
    pub max_body_size_kb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level, used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            api_key: default_api_key(),
            max_body_size_kb: default_max_body_size_kb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `customers` config file and
    /// `CUSTOMERS_*` environment variables (e.g. `CUSTOMERS_API_KEY`).
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("customers").required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("CUSTOMERS")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Whether `api_key` is still the built-in fallback
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_kb * 1024
    }

    /// Store backend selected by `database_url`
    pub fn store(&self) -> StoreConfig {
        StoreConfig::from_url(&self.database_url, self.max_connections)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://customers.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_max_body_size_kb() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
