//! Input validation helpers shared across operations

use super::{AppError, AppResult};

/// Maximum length for free-text notes
pub const MAX_NOTE_LEN: usize = 500;
/// Maximum length for names and labels
pub const MAX_NAME_LEN: usize = 100;

/// Validate an optional free-text field against a length limit
pub fn validate_optional_text(
    value: &Option<String>,
    field_name: &str,
    max_len: usize,
) -> AppResult<()> {
    if let Some(text) = value
        && text.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{} exceeds maximum length of {} characters",
            field_name, max_len
        )));
    }
    Ok(())
}

/// Validate a required name/label field
pub fn validate_name(value: &str, field_name: &str) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} cannot be empty", field_name)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "{} exceeds maximum length of {} characters",
            field_name, MAX_NAME_LEN
        )));
    }
    Ok(())
}
