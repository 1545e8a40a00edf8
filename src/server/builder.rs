//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::storage::MemoryStore;
use crate::utils::error::{Result, ShortenerError};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    store: Option<Arc<MemoryStore>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Serve links from an existing store instead of the configured one
    pub fn with_store(mut self, store: Arc<MemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| ShortenerError::Config("Configuration is required".to_string()))?;

        match self.store {
            Some(store) => HttpServer::with_store(&config, store),
            None => HttpServer::new(&config),
        }
    }
}

/// Build and run the server until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    let server = ServerBuilder::new().with_config(config.clone()).build()?;

    let deletion = config.deletion();
    info!(
        address = %config.server().address(),
        base_url = %config.server().base_url(),
        workers = deletion.workers,
        buffer_size = deletion.buffer_size,
        chunk_size = deletion.chunk_size,
        lanes = deletion.lanes,
        persistent = config.storage().file_path.is_some(),
        "Server starting"
    );
    info!("API endpoints:");
    info!("   GET    /health - Health check");
    info!("   POST   / - Shorten a plain-text URL");
    info!("   POST   /api/shorten - Shorten a URL");
    info!("   POST   /api/shorten/batch - Shorten many URLs");
    info!("   GET    /api/user/urls - List the caller's links");
    info!("   DELETE /api/user/urls - Queue deletion of the caller's links");
    info!("   GET    /api/internal/stats - Link and user totals (trusted subnet)");
    info!("   GET    /{{id}} - Follow a short link");

    server.start().await
}
