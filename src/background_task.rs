use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::{settings::RateLimitPolicy, shared_repos::SharedRepositories};

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically drops rate-limit and session state that can no longer affect a decision.
pub async fn start_purge_task(repos: SharedRepositories, policy: RateLimitPolicy) {
    let mut interval = interval(PURGE_INTERVAL);

    loop {
        interval.tick().await;
        let now = Utc::now();

        match repos.rate_store.purge_expired(now, policy.window).await {
            Ok(0) => {}
            Ok(count) => tracing::debug!("Purged {} idle rate-limit entries", count),
            Err(e) => tracing::error!("Rate-limit purge failed: {}", e),
        }

        match repos.session_store.purge_expired(now).await {
            Ok(0) => {}
            Ok(count) => tracing::debug!("Purged {} expired session entries", count),
            Err(e) => tracing::error!("Session purge failed: {}", e),
        }
    }
}
