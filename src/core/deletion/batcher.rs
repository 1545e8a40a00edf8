//! Splitting of deletion requests into bounded batches

use super::types::{Batch, ShortId, UserToken};

/// Default number of ids per batch
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Split `ids` into consecutive batches of `chunk_size`, the last one holding
/// the remainder. Order is preserved within and across batches.
pub fn split(ids: Vec<ShortId>, chunk_size: usize, user: &UserToken) -> Vec<Batch> {
    let chunk_size = chunk_size.max(1);
    let mut batches = Vec::with_capacity(ids.len().div_ceil(chunk_size));
    let mut ids = ids.into_iter().peekable();

    while ids.peek().is_some() {
        let chunk: Vec<ShortId> = ids.by_ref().take(chunk_size).collect();
        batches.push(Batch::new(chunk, user.clone()));
    }

    batches
}
