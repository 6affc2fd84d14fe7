use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;

/// Per-client ephemeral key-value store holding timestamps.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, AppError>;
    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), AppError>;

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, AppError> {
        Ok(0)
    }
}
