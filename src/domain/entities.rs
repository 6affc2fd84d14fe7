pub mod client;
pub mod submission;
