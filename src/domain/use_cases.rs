pub mod contact;
pub mod extractors;
pub mod rate_guard;
pub mod review;
