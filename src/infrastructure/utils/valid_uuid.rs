use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id, treating malformed ids as missing records.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Submission not found".to_string()))
}
