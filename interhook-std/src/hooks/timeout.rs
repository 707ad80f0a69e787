//! Timeout wrapper for time-limited handlers.

use interhook_core::{BoxError, Context, Flow, Handler};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned when a wrapped handler runs too long.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("handler timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// A handler that wraps another handler with a timeout.
///
/// Expiry is reported as a [`TimeoutError`], which propagates like any
/// other handler error.
pub struct TimeoutHook<H> {
    inner: H,
    duration: Duration,
}

impl<H> TimeoutHook<H> {
    /// Create a new timeout hook.
    pub fn new(inner: H, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<C, H> Handler<C> for TimeoutHook<H>
where
    C: Send + Sync + 'static,
    H: Handler<C>,
{
    async fn call(&self, ctx: Context<C>) -> Result<Flow, BoxError> {
        match timeout(self.duration, self.inner.call(ctx)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }
}
