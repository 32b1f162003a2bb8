//! Authentication context access on HTTP requests.
//!
//! The auth middleware stores an [`AuthInfo`] in the request extensions;
//! these helpers read it back in later layers and handlers.

use axum::extract::FromRequestParts;
use axum::http::Extensions;
use axum::http::request::Parts;

use crate::AppError;
use crate::jwt::{ADMIN_REQUIRED, AuthInfo};

/// Message used when a protected handler runs without an identity.
const AUTH_REQUIRED: &str = "no token provided";

/// Extension trait for extracting authentication from request extensions.
///
/// ```ignore
/// use burger_core::RequestAuthExt;
///
/// let auth = req.extensions().auth()?;        // Require authentication
/// let admin = req.extensions().auth_admin()?; // Require admin flag
/// ```
pub trait RequestAuthExt {
    /// Authentication info injected by the auth middleware.
    ///
    /// # Errors
    /// Returns `AppError::Unauthenticated` if auth info is not present.
    fn auth(&self) -> Result<AuthInfo, AppError>;

    /// Authentication info of an administrator.
    ///
    /// # Errors
    /// - `AppError::Unauthenticated` if not authenticated
    /// - `AppError::Forbidden` if not an admin
    fn auth_admin(&self) -> Result<AuthInfo, AppError>;

    /// Authentication info if present.
    fn try_auth(&self) -> Option<AuthInfo>;
}

impl RequestAuthExt for Extensions {
    fn auth(&self) -> Result<AuthInfo, AppError> {
        self.try_auth()
            .ok_or_else(|| AppError::Unauthenticated(AUTH_REQUIRED.to_string()))
    }

    fn auth_admin(&self) -> Result<AuthInfo, AppError> {
        match self.try_auth() {
            Some(auth) if auth.is_admin => Ok(auth),
            _ => Err(AppError::Forbidden(ADMIN_REQUIRED.to_string())),
        }
    }

    fn try_auth(&self) -> Option<AuthInfo> {
        self.get::<AuthInfo>().cloned()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthInfo {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_auth(is_admin: bool) -> Extensions {
        let mut ext = Extensions::new();
        ext.insert(AuthInfo {
            user_id: "65f1c0ffee0000000000abcd".to_string(),
            is_admin,
        });
        ext
    }

    #[test]
    fn missing_identity_is_unauthenticated() {
        let ext = Extensions::new();
        assert!(matches!(ext.auth(), Err(AppError::Unauthenticated(_))));
        assert!(ext.try_auth().is_none());
    }

    #[test]
    fn admin_check_uses_flag() {
        assert!(with_auth(true).auth_admin().is_ok());
        assert!(matches!(
            with_auth(false).auth_admin(),
            Err(AppError::Forbidden(msg)) if msg == ADMIN_REQUIRED
        ));
        assert!(matches!(
            Extensions::new().auth_admin(),
            Err(AppError::Forbidden(_))
        ));
    }
}
