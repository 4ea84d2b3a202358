//! Short code format checks for the redirect path.

use crate::AppError;
use serde_json::json;

/// Longest short code the link store accepts.
pub const MAX_CODE_LENGTH: usize = 32;

/// Rejects codes that cannot exist in the link store before touching the database.
///
/// # Rules
///
/// - Length: 1-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_short_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Invalid short code length",
            json!({ "max_length": MAX_CODE_LENGTH }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Short code contains invalid characters",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
