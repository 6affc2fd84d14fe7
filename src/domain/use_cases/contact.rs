use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    entities::{
        client::ClientContext,
        submission::{ContactForm, ContactResponse},
    },
    errors::AppError,
    notify::dispatcher::NotificationDispatcher,
    repositories::{clock::Clock, submission::SubmissionRepository},
    use_cases::rate_guard::{RateDecision, RateLimitGuard},
};

/// Entry point for contact form submissions.
///
/// Order per request: throttles, body, validation, persistence, session
/// cooldown, notification. Every attempt is counted, even one whose body could
/// not be read. Nothing after persistence can turn the request into a failure.
pub struct ContactHandler {
    pub submission_repo: Arc<dyn SubmissionRepository>,
    pub rate_guard: RateLimitGuard,
    pub dispatcher: NotificationDispatcher,
    pub clock: Arc<dyn Clock>,
}

impl ContactHandler {
    pub fn new(
        submission_repo: Arc<dyn SubmissionRepository>,
        rate_guard: RateLimitGuard,
        dispatcher: NotificationDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        ContactHandler {
            submission_repo,
            rate_guard,
            dispatcher,
            clock,
        }
    }

    /// Handles one contact form submission. `form` carries the extraction
    /// result so malformed bodies are throttled like any other attempt.
    pub async fn submit(
        &self,
        client: &ClientContext,
        form: Result<ContactForm, AppError>,
    ) -> Result<ContactResponse, AppError> {
        let now = self.clock.now();

        if let RateDecision::Deny(reason) = self.rate_guard.check(client, now).await? {
            warn!(client_ip = ?client.ip, ?reason, "Contact submission throttled");
            return Err(reason.into());
        }

        let form = form?.normalized();
        form.validate()?;

        let new_submission = form.prepare_for_insert(now, client.ip.clone(), client.user_agent.clone());
        let submission = self.submission_repo.create_submission(&new_submission).await?;

        info!(submission_id = %submission.id, client_ip = ?submission.client_ip, "Contact submission stored");

        if let Err(e) = self.rate_guard.record_success(client, now).await {
            error!(submission_id = %submission.id, error = %e, "Failed to start session cooldown");
        }

        self.dispatcher.dispatch(&submission).await;

        Ok(ContactResponse::accepted())
    }
}
