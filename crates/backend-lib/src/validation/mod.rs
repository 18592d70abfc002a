// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request input validation module.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::auth::{validate_password_strength, PasswordRequirements};
use crate::error::AppError;

// Common validation constants
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(
            "email must be 1-254 characters".to_string(),
        ));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "email is not a valid address".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a registration password against the configured requirements
pub fn validate_password(
    password: &str,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(
            "password exceeds 128 characters".to_string(),
        ));
    }

    if !validate_password_strength(password, requirements) {
        return Err(ValidationError::InvalidPassword(format!(
            "password must be at least {} characters and mix cases, digits and symbols",
            requirements.min_length
        )));
    }

    Ok(())
}
