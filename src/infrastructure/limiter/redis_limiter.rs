use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use uuid::Uuid;

use crate::{errors::AppError, repositories::rate_limit::RateLimitStore};

/// Rolling-window counter backed by one Redis sorted set per key.
///
/// Each attempt is a member scored by its timestamp in milliseconds. The
/// trim, insert and count run in a single MULTI block so concurrent
/// attempts from the same client are counted atomically.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    pool: Pool,
}

impl RedisRateLimitStore {
    pub fn new(pool: Pool) -> Self {
        RedisRateLimitStore { pool }
    }

    fn redis_key(key: &str) -> String {
        format!("rl:ip:{}", urlencoding::encode(key))
    }
}

/// Last rank removed by ZREMRANGEBYRANK so that only the newest `limit + 1`
/// members survive. Counts therefore saturate just above the limit.
fn trim_stop(limit: u32) -> isize {
    -(limit as isize) - 2
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn record_attempt(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
        limit: u32,
    ) -> Result<u32, AppError> {
        let mut conn = self.pool.get().await?;

        let key = Self::redis_key(key);
        let now_ms = now.timestamp_millis();
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let member = format!("{}-{}", now_ms, Uuid::new_v4().simple());

        let (count,): (u32,) = redis::pipe()
            .atomic()
            .zrembyscore(&key, "-inf", now_ms.saturating_sub(window_ms)).ignore()
            .zadd(&key, member, now_ms).ignore()
            .zremrangebyrank(&key, 0, trim_stop(limit)).ignore()
            .zcard(&key)
            .pexpire(&key, window_ms).ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count)
    }
}
