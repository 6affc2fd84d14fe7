use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use crate::{
    constants::LAST_SUBMISSION_KEY,
    entities::client::ClientContext,
    errors::AppError,
    repositories::{rate_limit::RateLimitStore, session::SessionStore},
    settings::RateLimitPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The client's address used up its attempts for the rolling window.
    GlobalLimit,
    /// The client's session had an accepted submission too recently.
    Cooldown { remaining: Duration },
}

/// Cooldown minutes are rounded down.
impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::GlobalLimit => AppError::RateLimitExceeded,
            DenyReason::Cooldown { remaining } => AppError::CooldownActive {
                minutes: remaining.as_secs() / 60,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allow,
    Deny(DenyReason),
}

/// Time left before a session may submit again, if any.
///
/// A missing timestamp means the session never submitted. A timestamp in the
/// future is treated as "just now".
pub fn cooldown_remaining(
    last_submission: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Option<Duration> {
    let last = last_submission?;
    let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);

    cooldown.checked_sub(elapsed).filter(|remaining| !remaining.is_zero())
}

/// Both throttles of the submission endpoint, evaluated before any validation.
#[derive(Clone)]
pub struct RateLimitGuard {
    rate_store: Arc<dyn RateLimitStore>,
    session_store: Arc<dyn SessionStore>,
    policy: RateLimitPolicy,
}

impl RateLimitGuard {
    pub fn new(
        rate_store: Arc<dyn RateLimitStore>,
        session_store: Arc<dyn SessionStore>,
        policy: RateLimitPolicy,
    ) -> Self {
        RateLimitGuard { rate_store, session_store, policy }
    }

    fn session_key(client: &ClientContext) -> String {
        format!("{}:{}", client.session_id, LAST_SUBMISSION_KEY)
    }

    /// Counts this attempt against the client's address, then checks the
    /// session cooldown. The address limit is reported first.
    pub async fn check(&self, client: &ClientContext, now: DateTime<Utc>) -> Result<RateDecision, AppError> {
        let attempts = self.rate_store
            .record_attempt(client.throttle_key(), now, self.policy.window, self.policy.max_attempts)
            .await?;

        if attempts > self.policy.max_attempts {
            return Ok(RateDecision::Deny(DenyReason::GlobalLimit));
        }

        let last_submission = self.session_store.get(&Self::session_key(client)).await?;

        match cooldown_remaining(last_submission, now, self.policy.cooldown) {
            Some(remaining) => Ok(RateDecision::Deny(DenyReason::Cooldown { remaining })),
            None => Ok(RateDecision::Allow),
        }
    }

    /// Starts the session cooldown. Call only after the submission is stored.
    pub async fn record_success(&self, client: &ClientContext, now: DateTime<Utc>) -> Result<(), AppError> {
        self.session_store.set(&Self::session_key(client), now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{limiter::rate_limiter::InMemoryRateLimitStore, session::memory_store::InMemorySessionStore};
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn guard() -> RateLimitGuard {
        let policy = RateLimitPolicy::default();
        RateLimitGuard::new(
            Arc::new(InMemoryRateLimitStore::new()),
            Arc::new(InMemorySessionStore::new(policy.cooldown)),
            policy,
        )
    }

    fn client(ip: &str, session: &str) -> ClientContext {
        ClientContext::new(Some(ip.into()), "test-agent", Some(session.into()))
    }

    #[test]
    fn cooldown_is_rounded_down_to_minutes() {
        let cooldown = Duration::from_secs(300);
        let remaining = cooldown_remaining(Some(t0()), t0() + TimeDelta::seconds(120), cooldown);
        assert_eq!(remaining, Some(Duration::from_secs(180)));

        let reason = DenyReason::Cooldown { remaining: Duration::from_millis(179_500) };
        assert!(matches!(AppError::from(reason), AppError::CooldownActive { minutes: 2 }));

        let reason = DenyReason::Cooldown { remaining: Duration::from_secs(59) };
        assert!(matches!(AppError::from(reason), AppError::CooldownActive { minutes: 0 }));
    }

    #[test]
    fn cooldown_ends_exactly_at_the_period() {
        let cooldown = Duration::from_secs(300);
        assert_eq!(cooldown_remaining(None, t0(), cooldown), None);
        assert_eq!(cooldown_remaining(Some(t0()), t0() + TimeDelta::seconds(300), cooldown), None);
        assert_eq!(
            cooldown_remaining(Some(t0() + TimeDelta::seconds(30)), t0(), cooldown),
            Some(cooldown)
        );
    }

    #[tokio::test]
    async fn fourth_attempt_from_one_address_is_denied() {
        let guard = guard();

        for i in 0..3 {
            let decision = guard.check(&client("198.51.100.4", &format!("s{i}")), t0()).await.unwrap();
            assert_eq!(decision, RateDecision::Allow);
        }

        let decision = guard.check(&client("198.51.100.4", "s9"), t0()).await.unwrap();
        assert_eq!(decision, RateDecision::Deny(DenyReason::GlobalLimit));

        let decision = guard.check(&client("198.51.100.5", "s9"), t0()).await.unwrap();
        assert_eq!(decision, RateDecision::Allow);
    }

    #[tokio::test]
    async fn cooldown_applies_only_after_recorded_success() {
        let guard = guard();
        let client = client("198.51.100.4", "abc");

        assert_eq!(guard.check(&client, t0()).await.unwrap(), RateDecision::Allow);
        guard.record_success(&client, t0()).await.unwrap();

        let decision = guard.check(&client, t0() + TimeDelta::seconds(120)).await.unwrap();
        match decision {
            RateDecision::Deny(reason) => {
                assert!(matches!(AppError::from(reason), AppError::CooldownActive { minutes: 3 }));
            }
            other => panic!("expected cooldown, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn address_limit_is_reported_before_cooldown() {
        let guard = guard();
        let client = client("198.51.100.4", "abc");
        guard.record_success(&client, t0()).await.unwrap();

        for _ in 0..3 {
            guard.check(&client, t0()).await.unwrap();
        }

        let decision = guard.check(&client, t0()).await.unwrap();
        assert_eq!(decision, RateDecision::Deny(DenyReason::GlobalLimit));
    }
}
