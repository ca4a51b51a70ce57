//! One-shot retry for transient store failures.
//!
//! Read paths (search, nearby) may safely repeat the whole operation when
//! the store reports a transient failure, since nothing was committed.
//! Write paths must never use this: repeating a mutation could apply it
//! twice.

use std::future::Future;

use spotwatch_core::error::CoreError;

/// Run a read operation, retrying exactly once on `TransientStore`.
///
/// Any other error, and a transient failure on the second attempt, are
/// surfaced as-is.
pub async fn read_with_retry<T, Fut>(mut op: impl FnMut() -> Fut) -> Result<T, CoreError>
where
    Fut: Future<Output = Result<T, CoreError>>,
{
    match op().await {
        Err(CoreError::TransientStore(reason)) => {
            tracing::warn!(%reason, "Transient store failure on read path, retrying once");
            op().await
        }
        other => other,
    }
}
