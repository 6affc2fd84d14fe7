use async_trait::async_trait;

use crate::{entities::submission::Submission, errors::NotificationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// No destination configured.
    Skipped,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &Submission) -> Result<DeliveryOutcome, NotificationError>;
}
