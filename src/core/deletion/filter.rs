//! Fan-out/fan-in ownership filter
//!
//! For one [`Batch`] the filter builds its own short-lived set of `L` lanes:
//!
//! ```text
//!                      ┌─> lane 0 ──┐
//! batch ─> distributor ├─> lane 1 ──┼─> merge ─> ConfirmedSet
//!        (round robin) └─> lane L-1 ┘  (wait all)
//! ```
//!
//! Pair `i` goes to lane `i mod L`. Each lane asks the [`OwnershipOracle`] and
//! forwards owned ids only. A failed lookup counts as "not owned". The merged
//! output closes once every lane has closed and carries no ordering guarantee.

use super::traits::OwnershipOracle;
use super::types::{Batch, ConfirmedSet, OwnershipDecision, ShortId, UserToken};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Default number of lanes per batch
pub const DEFAULT_LANES: usize = 10;

// Smallest tokio buffer; the distributor hands over one pair at a time
const LANE_CAPACITY: usize = 1;

/// Concurrent ownership filter for a single batch
#[derive(Clone)]
pub struct OwnershipFilter {
    oracle: Arc<dyn OwnershipOracle>,
    lanes: usize,
}

impl OwnershipFilter {
    pub fn new(oracle: Arc<dyn OwnershipOracle>, lanes: usize) -> Self {
        Self {
            oracle,
            lanes: lanes.max(1),
        }
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Start the filter and return the merged output channel.
    ///
    /// The receiver yields every owned id exactly once, in no particular order,
    /// and closes once all lanes are done. Cancelling `cancel` stops the
    /// distributor from handing out further pairs; checks already handed to a
    /// lane still complete.
    pub fn spawn(&self, batch: Batch, cancel: CancellationToken) -> mpsc::Receiver<ShortId> {
        let lane_inputs = self.fan_out(batch, cancel);
        let lane_outputs = lane_inputs
            .into_iter()
            .enumerate()
            .map(|(lane, input)| self.lane(lane, input))
            .collect();
        fan_in(lane_outputs)
    }

    /// Run the filter to completion and collect the confirmed ids
    pub async fn confirmed(&self, batch: Batch, cancel: CancellationToken) -> ConfirmedSet {
        let mut merged = self.spawn(batch, cancel);
        let mut confirmed = ConfirmedSet::new();
        while let Some(id) = merged.recv().await {
            confirmed.insert(id);
        }
        confirmed
    }

    fn fan_out(
        &self,
        batch: Batch,
        cancel: CancellationToken,
    ) -> Vec<mpsc::Receiver<(ShortId, UserToken)>> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..self.lanes).map(|_| mpsc::channel(LANE_CAPACITY)).unzip();

        tokio::spawn(async move {
            for (i, pair) in batch.into_pairs().enumerate() {
                let lane = &senders[i % senders.len()];
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!(distributed = i, "Distributor stopped by cancellation");
                        break;
                    }
                    sent = lane.send(pair) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            // Dropping the senders closes every lane input
        });

        receivers
    }

    fn lane(
        &self,
        lane: usize,
        mut input: mpsc::Receiver<(ShortId, UserToken)>,
    ) -> mpsc::Receiver<ShortId> {
        let (output, receiver) = mpsc::channel(LANE_CAPACITY);
        let oracle = Arc::clone(&self.oracle);

        tokio::spawn(async move {
            while let Some((id, user)) = input.recv().await {
                let decision = check_ownership(oracle.as_ref(), lane, id, &user).await;
                if decision.owned && output.send(decision.id).await.is_err() {
                    break;
                }
            }
        });

        receiver
    }
}

impl std::fmt::Debug for OwnershipFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipFilter")
            .field("lanes", &self.lanes)
            .finish_non_exhaustive()
    }
}

async fn check_ownership(
    oracle: &dyn OwnershipOracle,
    lane: usize,
    id: ShortId,
    user: &UserToken,
) -> OwnershipDecision {
    let owned = match oracle.is_owner(&id, user).await {
        Ok(owned) => owned,
        Err(e) => {
            // Never delete on uncertain ownership
            warn!(lane, short_id = %id, error = %e, "Ownership check failed, treating as not owned");
            false
        }
    };
    OwnershipDecision { id, owned }
}

fn fan_in(lanes: Vec<mpsc::Receiver<ShortId>>) -> mpsc::Receiver<ShortId> {
    let (merged, receiver) = mpsc::channel(lanes.len().max(1));

    tokio::spawn(async move {
        let mut collectors = JoinSet::new();
        for mut lane in lanes {
            let merged = merged.clone();
            collectors.spawn(async move {
                while let Some(id) = lane.recv().await {
                    if merged.send(id).await.is_err() {
                        break;
                    }
                }
            });
        }

        while let Some(joined) = collectors.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Fan-in collector aborted");
            }
        }
        // Last sender goes away here, closing the merged output
        drop(merged);
    });

    receiver
}
