//! Domain-level validation helpers for business rules.
//!
//! Every failure is an `AppError::InvalidRequest` carrying a message that
//! names the offending field.

use crate::AppError;

/// Minimum password length for security.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 255;
/// Maximum length of short text fields (names, titles, usernames).
pub const MAX_NAME_LENGTH: usize = 255;

/// Validate password length only, as used by the change and reset flows.
///
/// # Errors
/// Returns `AppError::InvalidRequest` if the password is too short.
pub fn validate_password_length(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Validate password strength beyond basic length.
///
/// # Errors
/// Returns `AppError::InvalidRequest` if the password is too short or lacks
/// a letter or a digit.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    validate_password_length(password)?;

    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_letter || !has_digit {
        return Err(AppError::invalid(
            "password must contain at least one letter and one number",
        ));
    }

    Ok(())
}

/// Validate email format (basic shape check).
///
/// # Errors
/// Returns `AppError::InvalidRequest` if the email format is invalid.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::invalid(format!(
            "email must not exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::invalid("invalid email format"));
    };

    if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(AppError::invalid("invalid email format"));
    }

    Ok(())
}

/// Validate a required, bounded text field.
///
/// # Errors
/// Returns `AppError::InvalidRequest` if the value is blank or too long.
pub fn validate_required(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(AppError::invalid(format!("{field} is required")));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::invalid(format!(
            "{field} must not exceed {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Validate an optional price: finite and not negative.
///
/// # Errors
/// Returns `AppError::InvalidRequest` for negative or non-finite prices.
pub fn validate_price(price: Option<f64>) -> Result<(), AppError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            Err(AppError::invalid("price must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_validation() {
        assert!(validate_password("longenough1").is_ok());
        assert!(validate_password("MySecure123").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
    }

    #[test]
    fn test_password_length_validation() {
        assert!(validate_password_length("abcdefgh").is_ok());
        assert!(validate_password_length("12345678").is_ok());
        assert!(validate_password_length("abc1234").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("b@x.com").is_ok());
        assert!(validate_email("test.user@domain.org").is_ok());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("nodomain").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("a b@c.d").is_err());
    }

    #[test]
    fn test_required_validation() {
        assert!(validate_required("name", "Bob").is_ok());
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("title", &"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_price_validation() {
        assert!(validate_price(None).is_ok());
        assert!(validate_price(Some(0.0)).is_ok());
        assert!(validate_price(Some(9.5)).is_ok());
        assert!(validate_price(Some(-1.0)).is_err());
        assert!(validate_price(Some(f64::NAN)).is_err());
    }
}
