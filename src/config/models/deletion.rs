//! Bulk deletion pipeline configuration

use crate::core::deletion::{DEFAULT_BUFFER_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_LANES, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};

/// Sizing of the deletion worker pool and per-batch fan-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionConfig {
    /// Long-lived workers draining the task queue
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Task queue capacity; producers wait once it is full
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Ids per batch (one task per batch)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Ownership-check lanes per batch
    #[serde(default = "default_lanes")]
    pub lanes: usize,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            buffer_size: default_buffer_size(),
            chunk_size: default_chunk_size(),
            lanes: default_lanes(),
        }
    }
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_lanes() -> usize {
    DEFAULT_LANES
}
