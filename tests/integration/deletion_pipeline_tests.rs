//! Deletion pipeline integration tests
//!
//! Backpressure, shutdown and ownership filtering across the queue, the
//! worker pool, the ownership filter and the storage sink.

#[cfg(test)]
mod tests {
    use crate::common::{
        CountingOracle, Gate, LinkFactory, RecordingSink, ScriptedOracle, ids, start_pool,
        wait_until,
    };
    use shortener_rs::ShortenerError;
    use shortener_rs::config::DeletionConfig;
    use shortener_rs::core::deletion::{
        Batch, ConfirmedSet, DeletionService, OwnershipFilter, ShortId, UserToken, WorkerPool,
        task,
    };
    use shortener_rs::storage::MemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn deletion_config(workers: usize, buffer_size: usize, chunk_size: usize, lanes: usize) -> DeletionConfig {
        DeletionConfig {
            workers,
            buffer_size,
            chunk_size,
            lanes,
        }
    }

    /// Queue a task that holds its worker until `gate` opens
    fn blocking_task(gate: &Arc<Gate>) -> shortener_rs::core::deletion::Task {
        let gate = Arc::clone(gate);
        task(move |_cancel| async move {
            gate.pass().await;
            Ok(())
        })
    }

    fn counting_task(counter: &Arc<AtomicUsize>) -> shortener_rs::core::deletion::Task {
        let counter = Arc::clone(counter);
        task(move |_cancel| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    // ==================== Backpressure ====================

    #[tokio::test]
    async fn test_submit_blocks_when_queue_is_full() {
        let buffer = 3;
        let pool = Arc::new(WorkerPool::new(1, buffer));
        let gate = Arc::new(Gate::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let (cancel, runner) = start_pool(&pool);

        // Occupy the only worker
        pool.submit(blocking_task(&gate)).await.unwrap();
        wait_until(|| gate.entered() == 1).await;

        for _ in 0..buffer {
            pool.queue().try_submit(counting_task(&counter)).unwrap();
        }
        assert_eq!(pool.queue().len(), buffer);

        // k + 1-th submission: rejected without waiting, pending with waiting
        assert!(matches!(
            pool.queue().try_submit(counting_task(&counter)),
            Err(ShortenerError::QueueFull(3))
        ));
        let blocked = {
            let pool = Arc::clone(&pool);
            let counter = Arc::clone(&counter);
            tokio::spawn(async move { pool.submit(counting_task(&counter)).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished());

        // Freeing the worker drains the queue and unblocks the producer
        gate.open(1);
        blocked.await.unwrap().unwrap();
        wait_until(|| counter.load(Ordering::SeqCst) == buffer + 1).await;

        cancel.cancel();
        runner.await.unwrap();
        assert_eq!(pool.stats().executed(), (buffer + 2) as u64);
        assert_eq!(pool.stats().discarded(), 0);
    }

    #[tokio::test]
    async fn test_delete_batch_waits_for_queue_space() {
        let pool = Arc::new(WorkerPool::new(1, 1));
        let sink = Arc::new(RecordingSink::default());
        let service = DeletionService::new(
            &pool,
            Arc::new(ScriptedOracle::owning(&["a"])),
            sink.clone(),
            &deletion_config(1, 1, 1, 2),
        );
        let gate = Arc::new(Gate::new());
        let (cancel, runner) = start_pool(&pool);

        pool.submit(blocking_task(&gate)).await.unwrap();
        wait_until(|| gate.entered() == 1).await;

        // Three batches of one id into a queue of one: the request cannot be
        // acknowledged until the worker frees up
        let request = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .delete_batch(ids(&["a", "b", "c"]), UserToken::from("u"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!request.is_finished());

        gate.open(1);
        assert_eq!(request.await.unwrap().unwrap(), 3);
        wait_until(|| sink.call_count() == 3).await;
        assert_eq!(sink.deleted(), ids(&["a"]).into_iter().collect());

        cancel.cancel();
        runner.await.unwrap();
    }

    // ==================== Shutdown ====================

    #[tokio::test]
    async fn test_shutdown_discards_queued_tasks() {
        let pool = Arc::new(WorkerPool::new(1, 10));
        let gate = Arc::new(Gate::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let (cancel, runner) = start_pool(&pool);

        pool.submit(blocking_task(&gate)).await.unwrap();
        wait_until(|| gate.entered() == 1).await;
        for _ in 0..4 {
            pool.submit(counting_task(&counter)).await.unwrap();
        }

        cancel.cancel();
        // In-flight task is allowed to finish
        gate.open(1);
        runner.await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(pool.stats().executed(), 1);
        assert_eq!(pool.stats().discarded(), 4);
        assert!(pool.queue().is_empty());
        assert!(matches!(
            pool.submit(counting_task(&counter)).await,
            Err(ShortenerError::QueueClosed)
        ));
    }

    #[tokio::test]
    async fn test_sink_calls_stop_at_shutdown() {
        let pool = Arc::new(WorkerPool::new(1, 10));
        let sink = Arc::new(RecordingSink::default());
        let service = DeletionService::new(
            &pool,
            Arc::new(ScriptedOracle::owning(&["a", "b", "c", "d", "e", "f", "g", "h"])),
            sink.clone(),
            &deletion_config(1, 10, 2, 2),
        );
        let gate = Arc::new(Gate::new());
        let (cancel, runner) = start_pool(&pool);

        service
            .delete_batch(ids(&["a", "b"]), UserToken::from("u"))
            .await
            .unwrap();
        wait_until(|| sink.call_count() == 1).await;
        let before_shutdown = sink.call_count();

        // Park the worker, then queue three batches behind it
        pool.submit(blocking_task(&gate)).await.unwrap();
        wait_until(|| gate.entered() == 1).await;
        let queued = service
            .delete_batch(ids(&["c", "d", "e", "f", "g", "h"]), UserToken::from("u"))
            .await
            .unwrap();
        assert_eq!(queued, 3);

        cancel.cancel();
        gate.open(1);
        runner.await.unwrap();

        assert_eq!(sink.call_count(), before_shutdown);
        assert_eq!(pool.stats().discarded(), 3);
        assert!(matches!(
            service
                .delete_batch(ids(&["c"]), UserToken::from("u"))
                .await,
            Err(ShortenerError::QueueClosed)
        ));
        assert_eq!(sink.call_count(), before_shutdown);
        assert_eq!(sink.deleted(), ids(&["a", "b"]).into_iter().collect());
    }

    #[tokio::test]
    async fn test_shutdown_with_idle_workers() {
        let pool = Arc::new(WorkerPool::new(4, 4));
        let (cancel, runner) = start_pool(&pool);
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), runner)
            .await
            .expect("pool stopped")
            .unwrap();
        assert_eq!(pool.stats().discarded(), 0);
    }

    // ==================== Ownership ====================

    #[tokio::test]
    async fn test_only_owned_links_are_deleted() {
        let store = Arc::new(MemoryStore::new());
        let alice = LinkFactory::create(&store, "alice", "a", 15);
        let bob = LinkFactory::create(&store, "bob", "b", 5);

        let pool = Arc::new(WorkerPool::new(3, 8));
        let service = DeletionService::new(
            &pool,
            store.clone(),
            store.clone(),
            &deletion_config(3, 8, 4, 3),
        );
        let (cancel, runner) = start_pool(&pool);

        let mut request = alice.clone();
        request.extend(bob.iter().cloned());
        request.push(ShortId::from("nobody"));
        let batches = service
            .delete_batch(request, UserToken::from("alice"))
            .await
            .unwrap();
        assert_eq!(batches, 6);

        wait_until(|| pool.stats().executed() == 6).await;
        for id in &alice {
            assert_eq!(store.is_deleted(id), Some(true), "{}", id);
        }
        for id in &bob {
            assert_eq!(store.is_deleted(id), Some(false), "{}", id);
        }
        assert!(store.links_for(&UserToken::from("alice")).is_empty());
        assert_eq!(store.links_for(&UserToken::from("bob")).len(), 5);

        cancel.cancel();
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn test_oracle_failure_is_not_ownership() {
        let pool = Arc::new(WorkerPool::new(2, 4));
        let sink = Arc::new(RecordingSink::default());
        let oracle = ScriptedOracle::owning(&["a", "b", "c"]).failing_on(&["b"]);
        let service = DeletionService::new(
            &pool,
            Arc::new(oracle),
            sink.clone(),
            &deletion_config(2, 4, 10, 2),
        );
        let (cancel, runner) = start_pool(&pool);

        service
            .delete_batch(ids(&["a", "b", "c", "d"]), UserToken::from("u"))
            .await
            .unwrap();
        wait_until(|| sink.call_count() == 1).await;
        assert_eq!(sink.deleted(), ids(&["a", "c"]).into_iter().collect());

        cancel.cancel();
        runner.await.unwrap();
    }

    #[tokio::test]
    async fn test_sink_called_once_even_when_nothing_is_owned() {
        let pool = Arc::new(WorkerPool::new(1, 4));
        let sink = Arc::new(RecordingSink::default());
        let service = DeletionService::new(
            &pool,
            Arc::new(ScriptedOracle::default()),
            sink.clone(),
            &deletion_config(1, 4, 10, 4),
        );
        let (cancel, runner) = start_pool(&pool);

        service
            .delete_batch(ids(&["x", "y"]), UserToken::from("u"))
            .await
            .unwrap();
        wait_until(|| sink.call_count() == 1).await;
        assert_eq!(sink.calls(), vec![ConfirmedSet::new()]);

        cancel.cancel();
        runner.await.unwrap();
    }

    // ==================== Filter concurrency ====================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_filter_checks_run_concurrently_up_to_lane_count() {
        let oracle = Arc::new(CountingOracle::new(Duration::from_millis(20)));
        let filter = OwnershipFilter::new(oracle.clone(), 4);
        let batch = Batch::new(
            (0..16).map(|i| ShortId::new(format!("id{}", i))).collect(),
            UserToken::from("u"),
        );

        let confirmed = filter.confirmed(batch, CancellationToken::new()).await;

        assert_eq!(confirmed.len(), 16);
        assert_eq!(oracle.calls(), 16);
        assert!(oracle.peak() >= 2, "peak = {}", oracle.peak());
        assert!(oracle.peak() <= 4, "peak = {}", oracle.peak());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_deleted_once() {
        let pool = Arc::new(WorkerPool::new(1, 4));
        let sink = Arc::new(RecordingSink::default());
        let service = DeletionService::new(
            &pool,
            Arc::new(ScriptedOracle::owning(&["a"])),
            sink.clone(),
            &deletion_config(1, 4, 10, 3),
        );
        let (cancel, runner) = start_pool(&pool);

        service
            .delete_batch(ids(&["a", "a", "a"]), UserToken::from("u"))
            .await
            .unwrap();
        wait_until(|| sink.call_count() == 1).await;
        assert_eq!(sink.calls()[0].len(), 1);

        cancel.cancel();
        runner.await.unwrap();
    }
}
