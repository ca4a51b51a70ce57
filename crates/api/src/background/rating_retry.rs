//! Background retry for failed rating recomputations.
//!
//! A review mutation must never fail because the rating cache could not be
//! rewritten. Handlers that hit a recompute failure enqueue the lot id
//! here; the worker keeps retrying on an interval until the recompute
//! succeeds or the server shuts down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use spotwatch_core::error::CoreError;
use spotwatch_core::types::LotId;
use spotwatch_store::{MemoryStore, RatingAggregator};

/// Cloneable handle for enqueueing lots whose rating needs recomputing.
#[derive(Clone)]
pub struct RatingRetryQueue {
    tx: mpsc::UnboundedSender<LotId>,
}

impl RatingRetryQueue {
    /// Create the queue and its receiving half for the worker.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LotId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue a lot for recompute retry.
    ///
    /// A send error only means the worker is gone (shutdown); the
    /// inconsistency is already logged at the enqueue site.
    pub fn enqueue(&self, lot_id: LotId) {
        let _ = self.tx.send(lot_id);
    }
}

/// Spawn the retry worker.
///
/// The worker drains the queue, retrying each recompute. A failed attempt
/// is re-enqueued after `interval_secs`; a `NotFound` lot is dropped for
/// good (nothing left to recompute). The task exits when `cancel` fires or
/// every queue handle is dropped.
pub fn spawn_rating_retry_worker(
    store: Arc<MemoryStore>,
    queue: RatingRetryQueue,
    mut rx: mpsc::UnboundedReceiver<LotId>,
    cancel: CancellationToken,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let lot_id = tokio::select! {
                () = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Some(lot_id) => lot_id,
                    None => break,
                },
            };

            match RatingAggregator::recompute(&store, lot_id).await {
                Ok(rating) => {
                    tracing::info!(
                        %lot_id,
                        average = rating.average,
                        count = rating.count,
                        "Rating recompute retry succeeded"
                    );
                }
                Err(CoreError::NotFound { .. }) => {
                    tracing::warn!(%lot_id, "Dropping rating retry for unknown lot");
                }
                Err(err) => {
                    tracing::warn!(%lot_id, error = %err, "Rating recompute retry failed, backing off");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(Duration::from_secs(interval_secs)) => {
                            queue.enqueue(lot_id);
                        }
                    }
                }
            }
        }
        tracing::info!("Rating retry worker stopped");
    })
}
