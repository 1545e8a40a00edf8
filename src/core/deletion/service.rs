//! Deletion service: entry point used by request handlers

use super::batcher::split;
use super::filter::OwnershipFilter;
use super::pool::WorkerPool;
use super::queue::{Task, TaskQueue, task};
use super::traits::{DeletionSink, OwnershipOracle};
use super::types::{Batch, ShortId, UserToken};
use crate::config::DeletionConfig;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Accepts bulk deletion requests and turns them into queued tasks.
///
/// Requests are acknowledged once every batch is queued; the outcome of the
/// deletion itself is never reported back to the caller. Ownership is checked
/// inside each task, not before queuing.
#[derive(Clone)]
pub struct DeletionService {
    queue: Arc<TaskQueue>,
    filter: OwnershipFilter,
    sink: Arc<dyn DeletionSink>,
    chunk_size: usize,
}

impl DeletionService {
    pub fn new(
        pool: &WorkerPool,
        oracle: Arc<dyn OwnershipOracle>,
        sink: Arc<dyn DeletionSink>,
        config: &DeletionConfig,
    ) -> Self {
        Self {
            queue: pool.queue(),
            filter: OwnershipFilter::new(oracle, config.lanes),
            sink,
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Queue deletion of `ids` on behalf of `user`.
    ///
    /// Waits while the task queue is full. Returns the number of batches
    /// queued, or `QueueClosed` once the worker pool has shut down.
    pub async fn delete_batch(&self, ids: Vec<ShortId>, user: UserToken) -> Result<usize> {
        let requested = ids.len();
        let batches = split(ids, self.chunk_size, &user);
        let queued = batches.len();

        for batch in batches {
            self.queue.submit(self.task_for(batch)).await?;
        }

        info!(user = %user, requested, batches = queued, "Deletion request queued");
        Ok(queued)
    }

    fn task_for(&self, batch: Batch) -> Task {
        let filter = self.filter.clone();
        let sink = Arc::clone(&self.sink);
        task(move |cancel| execute(filter, sink, batch, cancel))
    }
}

impl std::fmt::Debug for DeletionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionService")
            .field("queue", &self.queue)
            .field("filter", &self.filter)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

/// Body of one deletion task: filter, then exactly one bulk mutation
async fn execute(
    filter: OwnershipFilter,
    sink: Arc<dyn DeletionSink>,
    batch: Batch,
    cancel: CancellationToken,
) -> Result<()> {
    let user = batch.user.clone();
    let requested = batch.len();

    let confirmed = filter.confirmed(batch, cancel).await;
    debug!(
        user = %user,
        requested,
        confirmed = confirmed.len(),
        "Ownership filter finished"
    );

    sink.mark_deleted(&confirmed).await
}
