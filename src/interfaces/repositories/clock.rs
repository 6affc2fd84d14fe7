use chrono::{DateTime, Utc};

/// Source of the current time for rate limiting and timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
