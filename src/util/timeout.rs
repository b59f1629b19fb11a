//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::RagError;

/// Wrap a fallible future with a deadline; expiry becomes [`RagError::Timeout`].
///
/// `None` runs the future without a deadline.
pub async fn with_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, RagError>>,
) -> Result<T, RagError> {
    let Some(duration) = duration else {
        return future.await;
    };
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(RagError::Timeout(duration.as_millis() as u64)),
    }
}
