//! Application state shared across HTTP handlers

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::core::deletion::{
    DeletionService, DeletionSink, OwnershipOracle, PoolStats, TaskQueue, WorkerPool,
};
use crate::storage::MemoryStore;
use ipnet::IpNet;
use std::sync::Arc;
use tracing::warn;

/// HTTP server state shared across handlers
///
/// Cloned into every actix worker; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Link store, also the ownership oracle and deletion sink
    pub store: Arc<MemoryStore>,
    /// Resolves the caller of each request
    pub identity: Arc<dyn IdentityProvider>,
    /// Entry point of the deletion pipeline
    pub deletion: DeletionService,
    /// Worker pool queue, for diagnostics
    pub queue: Arc<TaskQueue>,
    /// Worker pool counters, for diagnostics
    pub pool_stats: Arc<PoolStats>,
    /// Clients allowed to read internal statistics
    pub trusted_subnet: Option<IpNet>,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: &WorkerPool,
        store: Arc<MemoryStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let deletion = DeletionService::new(
            pool,
            Arc::clone(&store) as Arc<dyn OwnershipOracle>,
            Arc::clone(&store) as Arc<dyn DeletionSink>,
            config.deletion(),
        );

        let trusted_subnet = config.server().trusted_subnet.as_deref().and_then(|raw| {
            raw.parse::<IpNet>()
                .map_err(|e| warn!(subnet = raw, error = %e, "Ignoring invalid trusted subnet"))
                .ok()
        });

        Self {
            trusted_subnet,
            config: Arc::new(config),
            store,
            identity,
            deletion,
            queue: pool.queue(),
            pool_stats: pool.stats(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
