use uuid::Uuid;

/// What the gateway knows about the caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub ip: Option<String>,
    pub user_agent: String,
    pub session_id: String,
    /// True when no session cookie came with the request and `session_id` was minted.
    pub new_session: bool,
}

impl ClientContext {
    pub fn new(ip: Option<String>, user_agent: impl Into<String>, session_id: Option<String>) -> Self {
        let (session_id, new_session) = match session_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => (id, false),
            None => (Uuid::new_v4().simple().to_string(), true),
        };

        ClientContext {
            ip,
            user_agent: user_agent.into(),
            session_id,
            new_session,
        }
    }

    /// Key used by the per-IP throttle. Clients without an address share one bucket.
    pub fn throttle_key(&self) -> &str {
        self.ip.as_deref().unwrap_or("unknown")
    }
}
