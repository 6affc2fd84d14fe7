use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Empty means submissions are kept in memory.
    #[serde(default)]
    pub database_url: String,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,

    #[serde(default)]
    pub notify_in_background: bool,

    #[serde(default = "default_max_attempts")]
    pub rate_limit_max_attempts: u32,

    #[serde(default = "default_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    #[serde(default = "default_true")]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_session_cookie")]
    pub session_cookie_name: String,

    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_webhook_timeout() -> u64 {
    10
}
fn default_max_attempts() -> u32 {
    3
}
fn default_window_secs() -> u64 {
    60 * 60
}
fn default_cooldown_secs() -> u64 {
    5 * 60
}
fn default_true() -> bool {
    true
}
fn default_session_cookie() -> String {
    "sessionid".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // The webhook has historically been configured through its own variable
        if config.webhook_url.is_none() {
            config.webhook_url = env::var("DISCORD_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.is_production() && self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL must be set in production".to_string());
        }
        if let Some(url) = &self.webhook_url {
            if let Err(e) = Url::parse(url) {
                errors.push(format!("WEBHOOK_URL is not a valid URL: {e}"));
            }
        }
        if self.webhook_timeout_secs == 0 {
            errors.push("WEBHOOK_TIMEOUT_SECS must be greater than zero".to_string());
        }
        if self.rate_limit_max_attempts == 0 {
            errors.push("RATE_LIMIT_MAX_ATTEMPTS must be greater than zero".to_string());
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero".to_string());
        }
        if self.session_cookie_name.trim().is_empty() {
            errors.push("SESSION_COOKIE_NAME cannot be empty".to_string());
        }
        if self.admin_token.as_ref().is_some_and(|t| t.len() < 32) {
            errors.push("ADMIN_TOKEN must be at least 32 characters".to_string());
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            Some(value) => value.as_str().redact(),
            None => "[NOT SET]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("redis_url", &self.redis_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("webhook_url", &self.webhook_url.redact())
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("notify_in_background", &self.notify_in_background)
            .field("rate_limit_max_attempts", &self.rate_limit_max_attempts)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("cooldown_secs", &self.cooldown_secs)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("admin_token", &self.admin_token.redact())
            .finish()
    }
}

/// Limits applied by the submission gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: u32,
    pub window: Duration,
    pub cooldown: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitPolicy {
            max_attempts: default_max_attempts(),
            window: Duration::from_secs(default_window_secs()),
            cooldown: Duration::from_secs(default_cooldown_secs()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Awaited inside the request, after the submission is stored.
    Inline,
    /// Spawned onto the runtime once the submission is stored.
    Background,
}

/// Explicit configuration handed to the gateway and its extractors.
#[derive(Clone)]
pub struct GatewayConfig {
    pub rate_limit: RateLimitPolicy,
    pub webhook_url: Option<Url>,
    pub webhook_timeout: Duration,
    pub delivery: DeliveryMode,
    pub trust_x_forwarded_for: bool,
    pub session_cookie_name: String,
    pub secure_cookies: bool,
    pub admin_token: Option<String>,
}

impl From<&AppConfig> for GatewayConfig {
    fn from(config: &AppConfig) -> Self {
        GatewayConfig {
            rate_limit: RateLimitPolicy {
                max_attempts: config.rate_limit_max_attempts,
                window: Duration::from_secs(config.rate_limit_window_secs),
                cooldown: Duration::from_secs(config.cooldown_secs),
            },
            webhook_url: config.webhook_url.as_deref().and_then(|url| Url::parse(url).ok()),
            webhook_timeout: Duration::from_secs(config.webhook_timeout_secs),
            delivery: if config.notify_in_background {
                DeliveryMode::Background
            } else {
                DeliveryMode::Inline
            },
            trust_x_forwarded_for: config.trust_x_forwarded_for,
            session_cookie_name: config.session_cookie_name.clone(),
            secure_cookies: config.is_production(),
            admin_token: config.admin_token.clone(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("rate_limit", &self.rate_limit)
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "[REDACTED]"))
            .field("webhook_timeout", &self.webhook_timeout)
            .field("delivery", &self.delivery)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("secure_cookies", &self.secure_cookies)
            .field("admin_token", &self.admin_token.redact())
            .finish()
    }
}
