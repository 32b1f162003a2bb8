//! User service: accounts, credentials and user management.
//!
//! Organized by domain:
//! - `mod.rs` - Core types, helpers, `UserService`
//! - `handlers.rs` - Thin axum handlers
//! - `account.rs` - Registration and login
//! - `management.rs` - Profile reads, updates and deletion
//! - `password.rs` - Password change and reset flows

mod account;
pub mod handlers;
mod management;
mod password;

use burger_core::validation::validate_required;
use burger_core::{AppError, AppResult, JwtValidator, OptionStrExt};
use burger_db::{DUPLICATE_USER, Database, Id, User};
use tracing::debug;

pub use account::{AdminSeed, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use password::{
    ChangePasswordRequest, ForgotPasswordRequest, ForgotPasswordResponse, ResetPasswordRequest,
};

/// Entity name used in `NotFound` messages.
const ENTITY: &str = "User";

// ============================================================================
// UserService
// ============================================================================

/// User service for account and credential management.
#[derive(Clone)]
pub struct UserService {
    db: Database,
    jwt: JwtValidator,
}

impl UserService {
    /// Creates a new user service instance.
    #[must_use]
    pub const fn new(db: Database, jwt: JwtValidator) -> Self {
        Self { db, jwt }
    }
}

// ============================================================================
// Helpers
// ============================================================================

impl UserService {
    /// Rejects a username or email already held by a user other than `except`.
    ///
    /// The unique indexes remain the final arbiter under concurrent writes.
    async fn ensure_available(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<Id>,
    ) -> AppResult<()> {
        let taken_by_other = |user: Option<User>| user.is_some_and(|u| Some(u.id) != except);

        if let Some(username) = username
            && taken_by_other(self.db.users.find_by_username(username).await?)
        {
            debug!(username, "Username already taken");
            return Err(AppError::invalid(DUPLICATE_USER));
        }

        if let Some(email) = email
            && taken_by_other(self.db.users.find_by_email(email).await?)
        {
            debug!(email, "Email already taken");
            return Err(AppError::invalid(DUPLICATE_USER));
        }

        Ok(())
    }

    /// Looks a user up by email, falling back to username.
    async fn find_by_email_or_username(
        &self,
        email: Option<String>,
        username: Option<String>,
    ) -> AppResult<Option<User>> {
        match (email.normalized(), username.normalized()) {
            (Some(email), _) => self.db.users.find_by_email(&email).await,
            (None, Some(username)) => self.db.users.find_by_username(&username).await,
            (None, None) => Err(AppError::invalid("email or username is required")),
        }
    }
}

/// Trimmed, non-blank, bounded value of a required text field.
fn required(field: &str, value: Option<String>) -> AppResult<String> {
    let value = value
        .normalized()
        .ok_or_else(|| AppError::invalid(format!("{field} is required")))?;
    validate_required(field, &value)?;
    Ok(value)
}

/// Non-empty password as sent. Passwords are never trimmed.
fn required_password(field: &str, value: Option<String>) -> AppResult<String> {
    value
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::invalid(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", Some(" Bob ".into())).unwrap(), "Bob");
        assert!(matches!(
            required("name", Some("   ".into())),
            Err(AppError::InvalidRequest(msg)) if msg == "name is required"
        ));
        assert!(required("name", None).is_err());
    }

    #[test]
    fn passwords_keep_surrounding_whitespace() {
        assert_eq!(
            required_password("password", Some(" secret1 ".into())).unwrap(),
            " secret1 "
        );
        assert!(required_password("password", Some(String::new())).is_err());
    }
}
