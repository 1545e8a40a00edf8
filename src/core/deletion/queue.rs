//! Bounded FIFO of deferred deletion tasks
//!
//! The queue is a fixed-capacity lock-free ring gated by two semaphores: one
//! counting free slots (producers wait on it, which is the backpressure path)
//! and one counting queued tasks (workers wait on it). Closing both semaphores
//! switches the queue into a rejecting state instead of leaving producers
//! blocked forever.

use crate::utils::error::{Result, ShortenerError};
use crossbeam_queue::ArrayQueue;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use tokio::sync::{Semaphore, TryAcquireError};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Default queue capacity
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Future produced by a running task
pub type TaskFuture = BoxFuture<'static, Result<()>>;

/// One deferred unit of work. It receives the pool-wide cancellation token and
/// runs at most once.
pub type Task = Box<dyn FnOnce(CancellationToken) -> TaskFuture + Send + 'static>;

/// Box a closure into a [`Task`]
pub fn task<F, Fut>(f: F) -> Task
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Box::new(move |cancel| f(cancel).boxed())
}

/// Bounded multi-producer, multi-consumer task queue
pub struct TaskQueue {
    tasks: ArrayQueue<Task>,
    slots: Semaphore,
    ready: Semaphore,
    capacity: usize,
}

impl TaskQueue {
    /// Create a queue holding at most `capacity` tasks (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            tasks: ArrayQueue::new(capacity),
            slots: Semaphore::new(capacity),
            ready: Semaphore::new(0),
            capacity,
        }
    }

    /// Enqueue a task, waiting while the queue is full.
    ///
    /// Fails with [`ShortenerError::QueueClosed`] once the queue is closed,
    /// including for producers that were waiting at that moment.
    pub async fn submit(&self, task: Task) -> Result<()> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| ShortenerError::QueueClosed)?;
        permit.forget();
        self.push(task)
    }

    /// Enqueue a task without waiting
    pub fn try_submit(&self, task: Task) -> Result<()> {
        match self.slots.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.push(task)
            }
            Err(TryAcquireError::NoPermits) => Err(ShortenerError::QueueFull(self.capacity)),
            Err(TryAcquireError::Closed) => Err(ShortenerError::QueueClosed),
        }
    }

    fn push(&self, task: Task) -> Result<()> {
        // A slot permit was taken, so the ring has room
        if self.tasks.push(task).is_err() {
            return Err(ShortenerError::internal("task queue slot accounting broken"));
        }
        self.ready.add_permits(1);
        trace!(queued = self.tasks.len(), "Task enqueued");
        Ok(())
    }

    /// Wait for the next task in FIFO order.
    ///
    /// Returns `None` once the queue is closed. Cancel-safe: dropping the
    /// future before it resolves never loses a task.
    pub async fn recv(&self) -> Option<Task> {
        let permit = self.ready.acquire().await.ok()?;
        permit.forget();
        let task = self.tasks.pop();
        self.slots.add_permits(1);
        task
    }

    /// Stop accepting and handing out tasks. Idempotent.
    pub fn close(&self) {
        self.slots.close();
        self.ready.close();
    }

    /// Drop every task still resident, returning how many were discarded
    pub fn drain(&self) -> usize {
        let mut dropped = 0;
        while self.tasks.pop().is_some() {
            dropped += 1;
        }
        dropped
    }

    pub fn is_closed(&self) -> bool {
        self.slots.is_closed()
    }

    /// Number of tasks waiting to be claimed
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}
