//! Storage collaborators consumed by the deletion pipeline

use super::types::{ConfirmedSet, ShortId, UserToken};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Answers whether a user owns a short link
///
/// Implementations must return `Ok(false)` for unknown ids rather than an
/// error. An `Err` is reserved for the storage layer itself failing.
#[async_trait]
pub trait OwnershipOracle: Send + Sync {
    async fn is_owner(&self, id: &ShortId, user: &UserToken) -> Result<bool>;
}

/// Applies one bulk "mark deleted" mutation
///
/// Called exactly once per task, including with an empty set. The mutation is
/// expected to be atomic at the storage layer.
#[async_trait]
pub trait DeletionSink: Send + Sync {
    async fn mark_deleted(&self, ids: &ConfirmedSet) -> Result<()>;
}
