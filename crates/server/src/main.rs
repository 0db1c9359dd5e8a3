//! Customer server - HTTP REST API for customer records
//!
//! Serves the `/customers` endpoints behind an `X-API-KEY` check.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
