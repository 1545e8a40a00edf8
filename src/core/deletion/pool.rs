//! Fixed-size pool of long-lived deletion workers
//!
//! Each worker loops Idle → Executing → Idle until it observes the shared
//! cancellation token while idle, then terminates. A task that has been claimed
//! always runs to completion. Tasks still queued when the last worker exits are
//! discarded, and the queue is closed so producers are rejected rather than
//! blocked.

use super::queue::{DEFAULT_BUFFER_SIZE, Task, TaskQueue};
use crate::utils::error::Result;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Default number of workers
pub const DEFAULT_WORKERS: usize = 10;

/// Counters maintained by the workers
#[derive(Debug, Default)]
pub struct PoolStats {
    executed: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl PoolStats {
    /// Tasks that ran to completion, successfully or not
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    /// Tasks that returned an error or panicked
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Tasks dropped from the queue at shutdown
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }
}

/// Worker pool draining a shared [`TaskQueue`]
#[derive(Debug)]
pub struct WorkerPool {
    num_workers: usize,
    queue: Arc<TaskQueue>,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Create a pool; sizes are fixed for its lifetime
    pub fn new(num_workers: usize, buffer_size: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
            queue: Arc::new(TaskQueue::new(buffer_size)),
            stats: Arc::new(PoolStats::default()),
        }
    }

    /// Handle for producers
    pub fn queue(&self) -> Arc<TaskQueue> {
        Arc::clone(&self.queue)
    }

    pub fn stats(&self) -> Arc<PoolStats> {
        Arc::clone(&self.stats)
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Submit a task, waiting while the queue is full
    pub async fn submit(&self, task: Task) -> Result<()> {
        self.queue.submit(task).await
    }

    /// Run all workers until `cancel` fires and every worker has gone idle.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            workers = self.num_workers,
            buffer = self.queue.capacity(),
            "Starting deletion worker pool"
        );

        let mut workers = JoinSet::new();
        for id in 0..self.num_workers {
            workers.spawn(worker_loop(
                id,
                Arc::clone(&self.queue),
                Arc::clone(&self.stats),
                cancel.clone(),
            ));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Deletion worker aborted");
            }
        }

        self.queue.close();
        let dropped = self.queue.drain();
        self.stats
            .discarded
            .fetch_add(dropped as u64, Ordering::Relaxed);
        if dropped > 0 {
            info!(dropped, "Discarded queued deletion tasks on shutdown");
        }
        info!("Deletion worker pool stopped");
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS, DEFAULT_BUFFER_SIZE)
    }
}

async fn worker_loop(
    id: usize,
    queue: Arc<TaskQueue>,
    stats: Arc<PoolStats>,
    cancel: CancellationToken,
) {
    debug!(worker = id, "Worker started");

    loop {
        // Cancellation wins over a ready task so nothing new starts after shutdown
        let task = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            task = queue.recv() => match task {
                Some(task) => task,
                None => break,
            },
        };

        let outcome = AssertUnwindSafe(task(cancel.clone())).catch_unwind().await;
        stats.executed.fetch_add(1, Ordering::Relaxed);
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(worker = id, error = %e, "Deletion task failed");
            }
            Err(_) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(worker = id, "Deletion task panicked");
            }
        }
    }

    debug!(worker = id, "Worker stopped");
}
