//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Caller identity from the upstream gateway (`x-user-id`)
pub const MAX_USER_ID_LEN: usize = 128;

/// Role names (`x-user-role`)
pub const MAX_ROLE_LEN: usize = 32;

// ── Validation helpers ──────────────────────────────────────────────

/// Check that a required string is non-empty and within the length limit.
///
/// Returns the human-readable reason on failure.
pub fn check_required_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.len() > max_len {
        return Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ));
    }
    Ok(())
}

/// [`check_required_text`] for HTTP handlers
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    check_required_text(value, field, max_len).map_err(AppError::validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(check_required_text("alice", "user_id", MAX_USER_ID_LEN).is_ok());
        assert!(check_required_text("   ", "user_id", MAX_USER_ID_LEN).is_err());

        let long = "x".repeat(MAX_USER_ID_LEN + 1);
        let err = check_required_text(&long, "user_id", MAX_USER_ID_LEN).unwrap_err();
        assert!(err.contains("too long"));
    }

    #[test]
    fn test_validate_required_text_is_validation_error() {
        let err = validate_required_text("", "role", MAX_ROLE_LEN).unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::ValidationFailed);
    }
}
