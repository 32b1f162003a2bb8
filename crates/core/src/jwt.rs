//! JWT token issuance, validation, and claims.
//!
//! Centralizes all JWT handling with a shared validator for encoding and decoding.
//! Keys are derived once from the signing secret and cached for the lifetime
//! of the application.
//!
//! This module is database-agnostic: implement `JwtSubject` for your user type.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppError;

/// Lifetime of an issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Trait for types that can be used as JWT subjects.
pub trait JwtSubject {
    /// Subject's unique identifier, rendered as a string.
    fn subject_id(&self) -> String;
    /// Whether the subject holds administrator privileges.
    fn is_admin(&self) -> bool;
}

/// Validated authentication info from a bearer token.
///
/// Single source of truth for the caller identity across middleware and handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    pub user_id: String,
    pub is_admin: bool,
}

impl AuthInfo {
    /// Check if the caller can access the target user's resource.
    #[inline]
    #[must_use]
    pub fn can_access(&self, target_user_id: &str) -> bool {
        self.user_id == target_user_id || self.is_admin
    }

    /// Require access to target user, returning `Forbidden` if denied.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` when the caller is neither the target nor an admin.
    pub fn require_access(&self, target_user_id: &str, action: &str) -> Result<(), AppError> {
        if self.can_access(target_user_id) {
            Ok(())
        } else {
            warn!(user_id = %self.user_id, target = %target_user_id, action, "Permission denied");
            Err(AppError::Forbidden(format!(
                "cannot {action} for other users"
            )))
        }
    }

    /// Require administrator privileges.
    ///
    /// # Errors
    /// Returns `AppError::Forbidden` when the caller is not an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()))
        }
    }
}

/// Message returned when an operation requires an administrator.
pub const ADMIN_REQUIRED: &str = "admin privileges required";

/// JWT claims: `{userId, isAdmin}` plus the registered time claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (user id). Optional so a payload without it is rejected as a
    /// claim error rather than a decoding error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// JWT validation errors.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("no token provided")]
    MissingHeader,
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("invalid claim: {0}")]
    InvalidClaim(&'static str),
    #[error("signing secret is not configured")]
    MissingSecret,
}

impl JwtError {
    /// Message safe to send to the client.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::MissingHeader => "no token provided",
            Self::InvalidFormat => "invalid token format",
            Self::InvalidToken(_) | Self::InvalidClaim(_) | Self::MissingSecret => "invalid token",
        }
    }
}

impl TryFrom<Claims> for AuthInfo {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or(JwtError::InvalidClaim("userId"))?;

        Ok(Self {
            user_id,
            is_admin: claims.is_admin,
        })
    }
}

/// Pre-compiled JWT validator with cached encoding/decoding keys.
///
/// Cheap to clone: keys are shared behind `Arc`.
#[derive(Clone)]
pub struct JwtValidator {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtValidator {
    /// Create a new validator from a secret.
    ///
    /// # Errors
    /// Returns `JwtError::MissingSecret` if the secret is empty.
    pub fn new(secret: &SecretString) -> Result<Self, JwtError> {
        let secret_bytes = secret.expose_secret().trim().as_bytes();
        if secret_bytes.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret_bytes)),
            decoding_key: Arc::new(DecodingKey::from_secret(secret_bytes)),
            validation,
        })
    }

    /// Issue a 7-day token for any type implementing `JwtSubject`.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if encoding fails.
    pub fn issue_token<T: JwtSubject>(&self, subject: &T) -> Result<String, AppError> {
        self.issue_token_with_ttl(subject, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Issue a token with an explicit lifetime.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if encoding fails.
    pub fn issue_token_with_ttl<T: JwtSubject>(
        &self,
        subject: &T,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();

        let claims = Claims {
            user_id: Some(subject.subject_id()),
            is_admin: subject.is_admin(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("JWT encoding failed: {e}")))
    }

    /// Validate a JWT and extract auth info.
    ///
    /// # Errors
    /// Returns `JwtError::InvalidToken` on a bad signature or expiry and
    /// `JwtError::InvalidClaim` when the payload lacks a user id.
    pub fn validate(&self, token: &str) -> Result<AuthInfo, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        token_data.claims.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestUser {
        id: String,
        admin: bool,
    }

    impl JwtSubject for TestUser {
        fn subject_id(&self) -> String {
            self.id.clone()
        }
        fn is_admin(&self) -> bool {
            self.admin
        }
    }

    fn test_user(admin: bool) -> TestUser {
        TestUser {
            id: "65f1c0ffee0000000000abcd".to_string(),
            admin,
        }
    }

    fn validator() -> JwtValidator {
        JwtValidator::new(&SecretString::from("test_secret_key")).unwrap()
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let validator = validator();

        for admin in [false, true] {
            let user = test_user(admin);
            let token = validator.issue_token(&user).unwrap();
            let auth = validator.validate(&token).unwrap();

            assert_eq!(auth.user_id, user.id);
            assert_eq!(auth.is_admin, admin);
        }
    }

    #[test]
    fn expired_token_rejected() {
        let validator = validator();
        let token = validator
            .issue_token_with_ttl(&test_user(false), Duration::hours(-2))
            .unwrap();

        assert!(matches!(
            validator.validate(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let other = JwtValidator::new(&SecretString::from("another_secret")).unwrap();
        let token = other.issue_token(&test_user(true)).unwrap();

        assert!(validator().validate(&token).is_err());
    }

    #[test]
    fn payload_without_user_id_rejected() {
        let validator = validator();
        let now = Utc::now();
        let claims = Claims {
            user_id: None,
            is_admin: true,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &validator.encoding_key).unwrap();

        assert!(matches!(
            validator.validate(&token),
            Err(JwtError::InvalidClaim("userId"))
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            JwtValidator::new(&SecretString::from("  ")),
            Err(JwtError::MissingSecret)
        ));
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(validator().validate("invalid.token.here").is_err());
    }

    #[test]
    fn auth_info_access_control() {
        let admin = AuthInfo {
            user_id: "a".to_string(),
            is_admin: true,
        };
        let user = AuthInfo {
            user_id: "u".to_string(),
            is_admin: false,
        };

        assert!(admin.can_access("someone"));
        assert!(user.can_access("u"));
        assert!(!user.can_access("someone"));
        assert!(user.require_admin().is_err());
        assert!(admin.require_admin().is_ok());
        assert!(matches!(
            user.require_access("someone", "update user"),
            Err(AppError::Forbidden(_))
        ));
    }
}
