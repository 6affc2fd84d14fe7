use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{clock, db, limiter, notify, session, utils};

use notify::{dispatcher::NotificationDispatcher, webhook::WebhookNotifier};
use repositories::{clock::Clock, notifier::Notifier};
use settings::{AppConfig, GatewayConfig};
use shared_repos::SharedRepositories;
use use_cases::{contact::ContactHandler, rate_guard::RateLimitGuard, review::SubmissionReviewHandler};

pub struct AppState {
    pub contact_handler: ContactHandler,
    pub review_handler: SubmissionReviewHandler,
    pub config: GatewayConfig,
}

impl AppState {
    /// Wires the gateway with the webhook notifier described by `config`.
    pub fn new(
        config: &AppConfig,
        repos: SharedRepositories,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, errors::NotificationError> {
        let gateway = GatewayConfig::from(config);
        let notifier = WebhookNotifier::new(gateway.webhook_url.clone(), gateway.webhook_timeout)?;

        Ok(Self::with_notifier(gateway, repos, Arc::new(notifier), clock))
    }

    pub fn with_notifier(
        config: GatewayConfig,
        repos: SharedRepositories,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rate_guard = RateLimitGuard::new(
            repos.rate_store.clone(),
            repos.session_store.clone(),
            config.rate_limit,
        );
        let dispatcher = NotificationDispatcher::new(notifier, config.delivery);
        let contact_handler = ContactHandler::new(
            repos.submission_repo.clone(),
            rate_guard,
            dispatcher,
            clock,
        );
        let review_handler = SubmissionReviewHandler::new(repos.submission_repo);

        AppState {
            contact_handler,
            review_handler,
            config,
        }
    }
}
