use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use tracing::info;

/// Builds a Redis pool and checks it answers before handing it out.
pub async fn create_redis_pool(redis_url: &str) -> anyhow::Result<Pool> {
    let pool = Config::from_url(redis_url).create_pool(Some(Runtime::Tokio1))?;

    let mut conn = pool.get().await?;
    let pong: String = conn.ping().await?;
    info!("Redis connection established ({}).", pong);

    Ok(pool)
}
