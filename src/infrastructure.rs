pub mod clock;
pub mod db;
pub mod limiter;
pub mod notify;
pub mod session;
pub mod utils;
