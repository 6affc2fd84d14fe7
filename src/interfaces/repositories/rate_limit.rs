use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;

/// Rolling-window attempt counter shared by every request.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records one attempt for `key` at `now` and returns how many attempts,
    /// this one included, fall inside `(now - window, now]`.
    ///
    /// Only the most recent `limit + 1` attempts are retained, so the count
    /// saturates at `limit + 1`. That is enough to tell whether the limit is exceeded.
    async fn record_attempt(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
        limit: u32,
    ) -> Result<u32, AppError>;

    /// Drops state that can no longer affect a decision. Backends with native expiry skip this.
    async fn purge_expired(&self, _now: DateTime<Utc>, _window: Duration) -> Result<usize, AppError> {
        Ok(0)
    }
}
