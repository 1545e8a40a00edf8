//! Asynchronous bulk deletion pipeline
//!
//! ```text
//! caller ─> batcher ─> TaskQueue ─> WorkerPool ─> OwnershipFilter ─> DeletionSink
//!    └─ acknowledged as soon as every batch is queued
//! ```
//!
//! Delivery is at most once and best effort: tasks still queued when the pool
//! shuts down are discarded, and failures are logged rather than surfaced to
//! the original caller.

pub mod batcher;
pub mod filter;
pub mod pool;
pub mod queue;
pub mod service;
pub mod traits;
pub mod types;


pub use batcher::{DEFAULT_CHUNK_SIZE, split};
pub use filter::{DEFAULT_LANES, OwnershipFilter};
pub use pool::{DEFAULT_WORKERS, PoolStats, WorkerPool};
pub use queue::{DEFAULT_BUFFER_SIZE, Task, TaskFuture, TaskQueue, task};
pub use service::DeletionService;
pub use traits::{DeletionSink, OwnershipOracle};
pub use types::{Batch, ConfirmedSet, OwnershipDecision, ShortId, UserToken};
