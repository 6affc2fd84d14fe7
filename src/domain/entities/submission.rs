use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::constants::{
    INVALID_EMAIL_MESSAGE, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_SUBJECT_LENGTH,
    MIN_MESSAGE_LENGTH, REQUIRED_MESSAGE, SHORT_MESSAGE_MESSAGE, SUCCESS_MESSAGE,
};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: String,
    pub read: bool,
    pub replied: bool,
}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: String,
}

impl NewSubmission {
    pub fn into_submission(self, id: Uuid) -> Submission {
        Submission {
            id,
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            submitted_at: self.submitted_at,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            read: false,
            replied: false,
        }
    }
}

// ───── Request Payloads ──────────────────────────────────────────────

/// Raw contact form fields. Missing fields deserialize as empty so that
/// they are reported per field instead of failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_subject"))]
    pub subject: String,

    #[serde(default)]
    #[validate(custom(function = "validate_message"))]
    pub message: String,
}

impl ContactForm {
    /// Strips surrounding whitespace the way form fields are cleaned.
    pub fn normalized(self) -> Self {
        ContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn prepare_for_insert(
        self,
        submitted_at: DateTime<Utc>,
        client_ip: Option<String>,
        user_agent: String,
    ) -> NewSubmission {
        NewSubmission {
            name: self.name,
            email: self.email,
            subject: Some(self.subject).filter(|s| !s.is_empty()),
            message: self.message,
            submitted_at,
            client_ip,
            user_agent,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilter {
    pub read: Option<bool>,
    pub replied: Option<bool>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SubmissionFilter {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.per_page()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        if self.read.is_some_and(|read| read != submission.read) {
            return false;
        }
        if self.replied.is_some_and(|replied| replied != submission.replied) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                [
                    submission.name.as_str(),
                    submission.email.as_str(),
                    submission.subject.as_deref().unwrap_or(""),
                    submission.message.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubmissionStatusUpdate {
    pub read: Option<bool>,
    pub replied: Option<bool>,
}

// ───── Responses ─────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn accepted() -> Self {
        ContactResponse {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<Submission>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

// ───── Validators ────────────────────────────────────────────────────

fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", REQUIRED_MESSAGE.to_string()));
    }
    Ok(())
}

fn max_length(value: &str, max: usize) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length > max {
        return Err(field_error(
            "max_length",
            format!("Ensure this value has at most {max} characters (it has {length})."),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    required(name)?;
    max_length(name, MAX_NAME_LENGTH)
}

fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    required(email)?;
    if !email.validate_email() {
        return Err(field_error("invalid", INVALID_EMAIL_MESSAGE.to_string()));
    }
    max_length(email, MAX_EMAIL_LENGTH)
}

fn validate_subject(subject: &str) -> Result<(), ValidationError> {
    max_length(subject, MAX_SUBJECT_LENGTH)
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    required(message)?;
    if message.trim().chars().count() < MIN_MESSAGE_LENGTH {
        return Err(field_error("min_length", SHORT_MESSAGE_MESSAGE.to_string()));
    }
    Ok(())
}
