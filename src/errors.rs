use std::collections::BTreeMap;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

use crate::constants::{GLOBAL_LIMIT_MESSAGE, NON_FIELD_ERRORS};

/// Field name to the list of messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub enum AppError {
    ValidationError(FieldErrors),
    RateLimitExceeded,
    CooldownActive { minutes: u64 },
    NotFound(String),
    UnauthorizedAccess,
    /// Request body or query that could not be extracted.
    MalformedPayload { status: StatusCode, message: String },
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|(field, messages)| format!("{}:{}", field, messages.join(" ")))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::RateLimitExceeded => write!(f, "{}", GLOBAL_LIMIT_MESSAGE),
            AppError::CooldownActive { minutes } => {
                write!(f, "Please wait {} minutes before submitting again.", minutes)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::UnauthorizedAccess => write!(f, "Unauthorized access"),
            AppError::MalformedPayload { message, .. } => write!(f, "{}", message),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub errors: FieldErrors,
}

impl ErrorEnvelope {
    pub fn non_field(message: impl Into<String>) -> Self {
        ErrorEnvelope {
            success: false,
            errors: BTreeMap::from([(NON_FIELD_ERRORS.to_string(), vec![message.into()])]),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => ErrorEnvelope {
                success: false,
                errors: errors.clone(),
            },
            // Internal details stay in the logs
            AppError::InternalError(_) => ErrorEnvelope::non_field("Internal server error"),
            _ => ErrorEnvelope::non_field(self.to_string()),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::MalformedPayload { status, .. } => *status,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors = FieldErrors::new();

        for (field, entries) in errors.field_errors() {
            let messages = field_errors.entry(field.to_string()).or_default();
            messages.extend(entries.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string())
            }));
        }

        AppError::ValidationError(field_errors)
    }
}

/// Keeps the status and message of an extractor failure.
impl From<actix_web::Error> for AppError {
    fn from(err: actix_web::Error) -> Self {
        AppError::MalformedPayload {
            status: err.as_response_error().status_code(),
            message: err.to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Submission not found".into()),
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::InternalError(format!("Redis operation failed: {}", err))
    }
}

impl From<deadpool_redis::PoolError> for AppError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        AppError::InternalError(format!("Redis connection failed: {}", err))
    }
}


/// Outbound notification failures. Logged by the dispatcher, never returned to clients.
#[derive(Debug, Display)]
pub enum NotificationError {
    #[display("Webhook request timed out")]
    Timeout,

    #[display("Webhook transport error: {_0}")]
    Transport(String),

    #[display("Webhook responded with status {_0}")]
    Status(u16),

    #[display("Webhook client error: {_0}")]
    Client(String),
}

impl std::error::Error for NotificationError {}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotificationError::Timeout
        } else if let Some(status) = err.status() {
            NotificationError::Status(status.as_u16())
        } else {
            NotificationError::Transport(err.to_string())
        }
    }
}
