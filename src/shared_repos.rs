use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    db::{postgres::{create_pool, run_migrations}, redis_pool::create_redis_pool},
    limiter::{rate_limiter::InMemoryRateLimitStore, redis_limiter::RedisRateLimitStore},
    repositories::{
        memory::InMemorySubmissionRepo,
        rate_limit::RateLimitStore,
        session::SessionStore,
        sqlx_repo::SqlxSubmissionRepo,
        submission::SubmissionRepository,
    },
    session::{memory_store::InMemorySessionStore, redis_store::RedisSessionStore},
    settings::{AppConfig, RateLimitPolicy},
};

#[derive(Clone)]
pub struct SharedRepositories {
    pub submission_repo: Arc<dyn SubmissionRepository>,
    pub rate_store: Arc<dyn RateLimitStore>,
    pub session_store: Arc<dyn SessionStore>,
}

impl SharedRepositories {
    /// Everything in process memory. Used for development without backing services and in tests.
    pub fn in_memory(policy: &RateLimitPolicy) -> Self {
        SharedRepositories {
            submission_repo: Arc::new(InMemorySubmissionRepo::new()),
            rate_store: Arc::new(InMemoryRateLimitStore::new()),
            session_store: Arc::new(InMemorySessionStore::new(policy.cooldown)),
        }
    }

    /// Postgres for submissions when `database_url` is set, Redis for
    /// counters and sessions when `redis_url` is set, memory otherwise.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let policy = crate::settings::GatewayConfig::from(config).rate_limit;
        let mut repos = Self::in_memory(&policy);

        if config.database_url.trim().is_empty() {
            warn!("No database configured, submissions are kept in memory");
        } else {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            repos.submission_repo = Arc::new(SqlxSubmissionRepo::new(pool));
        }

        match config.redis_url.as_deref().filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let pool = create_redis_pool(url).await?;
                repos.rate_store = Arc::new(RedisRateLimitStore::new(pool.clone()));
                repos.session_store = Arc::new(RedisSessionStore::new(pool, policy.cooldown));
                info!("Rate limits and sessions are stored in Redis");
            }
            None => warn!("No Redis configured, rate limits and sessions are kept in memory"),
        }

        Ok(repos)
    }
}
