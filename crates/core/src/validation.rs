//! Input rules for user credentials.
//!
//! Pure functions returning a human-readable message on failure so callers
//! can wrap it in [`CoreError::Validation`](crate::error::CoreError::Validation).

/// Longest nickname the `users.nickname` column accepts.
pub const MAX_NICKNAME_LENGTH: usize = 100;

/// Minimum password length accepted on registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trim a nickname and check it is non-empty and fits the column.
///
/// Returns the trimmed nickname on success.
pub fn normalize_nickname(nickname: &str) -> Result<&str, String> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err("Nickname must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_NICKNAME_LENGTH {
        return Err(format!(
            "Nickname must be at most {MAX_NICKNAME_LENGTH} characters long"
        ));
    }
    Ok(trimmed)
}

/// Check that a password meets the minimum length.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}
