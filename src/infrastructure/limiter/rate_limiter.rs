use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::{clock::window_start, errors::AppError, repositories::rate_limit::RateLimitStore};

/// Timestamps of the most recent attempts for one key.
#[derive(Debug, Default)]
pub struct SlidingLog {
    hits: VecDeque<DateTime<Utc>>,
}

impl SlidingLog {
    fn evict(&mut self, now: DateTime<Utc>, window: Duration) {
        let start = window_start(now, window);
        while self.hits.front().is_some_and(|hit| *hit <= start) {
            self.hits.pop_front();
        }
    }

    /// Records an attempt at `now` and returns the attempts inside the window.
    pub fn record(&mut self, now: DateTime<Utc>, window: Duration, limit: u32) -> u32 {
        self.evict(now, window);
        self.hits.push_back(now);

        let keep = limit as usize + 1;
        while self.hits.len() > keep {
            self.hits.pop_front();
        }

        self.hits.len() as u32
    }

    /// True once the newest attempt has left the window.
    pub fn is_idle(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let start = window_start(now, window);
        self.hits.back().is_none_or(|last| *last <= start)
    }
}

/// Rolling-window counter keyed by client, held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryRateLimitStore {
    map: Arc<DashMap<String, SlidingLog>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn record_attempt(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
        limit: u32,
    ) -> Result<u32, AppError> {
        let mut log = self.map.entry(key.to_string()).or_default();
        Ok(log.record(now, window, limit))
    }

    async fn purge_expired(&self, now: DateTime<Utc>, window: Duration) -> Result<usize, AppError> {
        let before = self.map.len();
        self.map.retain(|_, log| !log.is_idle(now, window));
        Ok(before.saturating_sub(self.map.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    const HOUR: Duration = Duration::from_secs(3600);

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn counts_attempts_inside_the_window() {
        let mut log = SlidingLog::default();
        let counts: Vec<u32> = (0..4)
            .map(|i| log.record(t0() + TimeDelta::minutes(i * 10), HOUR, 3))
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn window_rolls_instead_of_resetting() {
        let mut log = SlidingLog::default();
        log.record(t0(), HOUR, 3);
        log.record(t0() + TimeDelta::minutes(40), HOUR, 3);
        log.record(t0() + TimeDelta::minutes(50), HOUR, 3);

        // The first attempt has aged out, the other two have not
        assert_eq!(log.record(t0() + TimeDelta::minutes(61), HOUR, 3), 3);
        assert_eq!(log.record(t0() + TimeDelta::minutes(62), HOUR, 3), 4);
    }

    #[test]
    fn attempt_exactly_one_window_old_is_outside() {
        let mut log = SlidingLog::default();
        log.record(t0(), HOUR, 3);
        assert_eq!(log.record(t0() + TimeDelta::hours(1), HOUR, 3), 1);
    }

    #[test]
    fn retained_history_is_bounded() {
        let mut log = SlidingLog::default();
        for i in 0..100 {
            log.record(t0() + TimeDelta::seconds(i), HOUR, 3);
        }
        assert_eq!(log.hits.len(), 4);
    }

    #[tokio::test]
    async fn store_keys_are_independent_and_purged_when_idle() {
        let store = InMemoryRateLimitStore::new();
        store.record_attempt("198.51.100.1", t0(), HOUR, 3).await.unwrap();
        store.record_attempt("198.51.100.1", t0(), HOUR, 3).await.unwrap();
        let other = store.record_attempt("198.51.100.2", t0(), HOUR, 3).await.unwrap();
        assert_eq!(other, 1);

        let purged = store.purge_expired(t0() + TimeDelta::minutes(30), HOUR).await.unwrap();
        assert_eq!(purged, 0);

        let purged = store.purge_expired(t0() + TimeDelta::hours(2), HOUR).await.unwrap();
        assert_eq!(purged, 2);
        assert_eq!(store.tracked_keys(), 0);
    }
}
