use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    entities::submission::Submission,
    repositories::notifier::{DeliveryOutcome, Notifier},
    settings::DeliveryMode,
};

/// Fire-and-forget delivery of submission notifications.
///
/// Must only be called once the submission is stored. Delivery problems are
/// logged here and never reach the caller.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    mode: DeliveryMode,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, mode: DeliveryMode) -> Self {
        NotificationDispatcher { notifier, mode }
    }

    pub async fn dispatch(&self, submission: &Submission) {
        match self.mode {
            DeliveryMode::Inline => deliver(self.notifier.clone(), submission.clone()).await,
            DeliveryMode::Background => {
                tokio::spawn(deliver(self.notifier.clone(), submission.clone()));
            }
        }
    }
}

async fn deliver(notifier: Arc<dyn Notifier>, submission: Submission) {
    match notifier.notify(&submission).await {
        Ok(DeliveryOutcome::Sent) => {
            info!(submission_id = %submission.id, "✅ Notification sent for submission from {}", submission.name);
        }
        Ok(DeliveryOutcome::Skipped) => {
            warn!(submission_id = %submission.id, "⚠️ No webhook URL configured, notification skipped");
        }
        Err(e) => {
            error!(submission_id = %submission.id, error = %e, "❌ Failed to send notification");
        }
    }
}
