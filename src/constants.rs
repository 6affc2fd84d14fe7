use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";
pub const GLOBAL_LIMIT_MESSAGE: &str = "Too many requests. Please try again in an hour.";
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const SHORT_MESSAGE_MESSAGE: &str = "Message must be at least 10 characters long.";

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_SUBJECT_LENGTH: usize = 255;
pub const MIN_MESSAGE_LENGTH: usize = 10;

/// Largest accepted urlencoded body, 2.5 MiB.
pub const MAX_FORM_BODY_BYTES: usize = 2_621_440;

/// Session entry holding the time of the last accepted submission.
pub const LAST_SUBMISSION_KEY: &str = "last_contact_submission";
