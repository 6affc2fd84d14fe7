pub mod clock;
pub mod memory;
pub mod notifier;
pub mod rate_limit;
pub mod session;
pub mod sqlx_repo;
pub mod submission;
