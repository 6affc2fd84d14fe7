use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::{errors::AppError, repositories::session::SessionStore};

/// Session values kept in Redis as millisecond timestamps that expire after `ttl`.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
    ttl: Duration,
}

impl RedisSessionStore {
    pub fn new(pool: Pool, ttl: Duration) -> Self {
        RedisSessionStore { pool, ttl }
    }

    fn redis_key(key: &str) -> String {
        format!("session:{}", urlencoding::encode(key))
    }
}

/// PSETEX rejects a zero expiry.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        let mut conn = self.pool.get().await?;
        let millis: Option<i64> = conn.get(Self::redis_key(key)).await?;
        Ok(millis.and_then(DateTime::<Utc>::from_timestamp_millis))
    }

    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        let _: () = conn
            .pset_ex(Self::redis_key(key), value.timestamp_millis(), ttl_millis(self.ttl))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_keys_are_escaped() {
        assert_eq!(
            RedisSessionStore::redis_key("3f2b9c0e:last_contact_submission"),
            "session:3f2b9c0e%3Alast_contact_submission"
        );
    }

    #[test]
    fn ttl_is_never_zero() {
        assert_eq!(ttl_millis(Duration::from_secs(300)), 300_000);
        assert_eq!(ttl_millis(Duration::ZERO), 1);
        assert_eq!(ttl_millis(Duration::MAX), u64::MAX);
    }
}
