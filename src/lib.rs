//! # shortener-rs
//!
//! A URL shortening service whose bulk deletion runs asynchronously.
//!
//! `DELETE /api/user/urls` is acknowledged immediately. The ids are split into
//! batches, each batch is queued as a task on a bounded queue, and a fixed pool
//! of workers runs the tasks. Inside a task, ownership of every id is checked
//! concurrently across several lanes, and the confirmed ids are flagged as
//! deleted in one storage call.
//!
//! ## Embedding the pipeline
//!
//! ```rust,no_run
//! use shortener_rs::config::DeletionConfig;
//! use shortener_rs::core::deletion::{DeletionService, WorkerPool};
//! use shortener_rs::storage::MemoryStore;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> shortener_rs::Result<()> {
//!     let config = DeletionConfig::default();
//!     let pool = Arc::new(WorkerPool::new(config.workers, config.buffer_size));
//!     let store = Arc::new(MemoryStore::new());
//!     let service = DeletionService::new(&pool, store.clone(), store.clone(), &config);
//!
//!     let cancel = CancellationToken::new();
//!     let runner = {
//!         let pool = Arc::clone(&pool);
//!         let cancel = cancel.clone();
//!         tokio::spawn(async move { pool.run(cancel).await })
//!     };
//!
//!     service
//!         .delete_batch(vec!["abc".into(), "def".into()], "user-1".into())
//!         .await?;
//!
//!     cancel.cancel();
//!     let _ = runner.await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, ShortenerError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build stamp logged at startup; fields the build could not determine read "N/A"
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Unix timestamp of the build
    pub date: &'static str,
    /// Short git commit hash
    pub commit: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        date: option_env!("BUILD_DATE").unwrap_or("N/A"),
        commit: option_env!("BUILD_COMMIT").unwrap_or("N/A"),
    }
}
