//! Test fixtures and helpers

use shortener_rs::core::deletion::{ShortId, UserToken, WorkerPool};
use shortener_rs::storage::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Populates a store with links for a user
pub struct LinkFactory;

impl LinkFactory {
    /// Insert `n` links named `{prefix}{i}` owned by `user`
    pub fn create(store: &MemoryStore, user: &str, prefix: &str, n: usize) -> Vec<ShortId> {
        (0..n)
            .map(|i| {
                let id = ShortId::new(format!("{}{}", prefix, i));
                let inserted = store
                    .insert(
                        id.clone(),
                        format!("https://example.com/{}/{}", user, i),
                        UserToken::from(user),
                    )
                    .unwrap();
                assert!(inserted, "duplicate fixture id {}", id);
                id
            })
            .collect()
    }
}

/// Short ids from string literals
pub fn ids(raw: &[&str]) -> Vec<ShortId> {
    raw.iter().map(|id| ShortId::from(*id)).collect()
}

/// Run `pool` in the background until the returned token is cancelled
pub fn start_pool(pool: &Arc<WorkerPool>) -> (CancellationToken, JoinHandle<()>) {
    let cancel = CancellationToken::new();
    let handle = {
        let pool = Arc::clone(pool);
        let cancel = cancel.clone();
        tokio::spawn(async move { pool.run(cancel).await })
    };
    (cancel, handle)
}

/// Poll `condition` every 5ms, failing the test after 5 seconds
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 5s"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
