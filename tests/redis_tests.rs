use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use portfolio_contact::{
    db::redis_pool::create_redis_pool,
    limiter::redis_limiter::RedisRateLimitStore,
    repositories::{rate_limit::RateLimitStore, session::SessionStore},
    session::redis_store::RedisSessionStore,
};
use uuid::Uuid;

fn redis_url() -> String {
    std::env::var("APP_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Redis at APP_REDIS_URL"]
async fn redis_counter_saturates_and_rolls_over() {
    let pool = create_redis_pool(&redis_url()).await.expect("Failed to connect to Redis");
    let store = RedisRateLimitStore::new(pool);
    let key = format!("test-{}", Uuid::new_v4());
    let window = Duration::from_secs(3600);
    let t0 = now_millis();

    for expected in 1..=4 {
        let at = t0 + TimeDelta::milliseconds(expected);
        assert_eq!(store.record_attempt(&key, at, window, 3).await.unwrap(), expected as u32);
    }
    let count = store.record_attempt(&key, t0 + TimeDelta::milliseconds(10), window, 3).await.unwrap();
    assert_eq!(count, 4);

    let later = t0 + TimeDelta::seconds(3601);
    assert_eq!(store.record_attempt(&key, later, window, 3).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires a running Redis at APP_REDIS_URL"]
async fn redis_session_round_trips_timestamps() {
    let pool = create_redis_pool(&redis_url()).await.expect("Failed to connect to Redis");
    let store = RedisSessionStore::new(pool, Duration::from_secs(300));
    let key = format!("{}:last_contact_submission", Uuid::new_v4().simple());
    let at = now_millis();

    assert_eq!(store.get(&key).await.unwrap(), None);
    store.set(&key, at).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), Some(at));
}
