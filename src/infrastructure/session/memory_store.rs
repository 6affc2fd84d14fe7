use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::{clock::window_start, errors::AppError, repositories::session::SessionStore};

/// Session values held in process memory. Entries older than `ttl` are dropped on purge.
#[derive(Clone)]
pub struct InMemorySessionStore {
    entries: Arc<DashMap<String, DateTime<Utc>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        InMemorySessionStore {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        Ok(self.entries.get(key).map(|entry| *entry.value()))
    }

    async fn set(&self, key: &str, value: DateTime<Utc>) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let cutoff = window_start(now, self.ttl);
        let before = self.entries.len();
        self.entries.retain(|_, stored| *stored > cutoff);
        Ok(before.saturating_sub(self.entries.len()))
    }
}
