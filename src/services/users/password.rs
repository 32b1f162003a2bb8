//! Password change and reset flows.

use burger_core::validation::validate_password_length;
use burger_core::{AppError, AppResult, AuthInfo, OptionExt, OptionStrExt, TokenGenerator, password};
use burger_db::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ENTITY, UserService, required_password};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: &'static str,
    pub reset_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub new_password: Option<String>,
}

impl UserService {
    /// Changes a password. Admins skip the current-password check.
    pub(super) async fn change_password(
        &self,
        auth: &AuthInfo,
        id: Id,
        req: ChangePasswordRequest,
    ) -> AppResult<()> {
        let new_password = required_password("newPassword", req.new_password)?;
        validate_password_length(&new_password)?;
        auth.require_access(&id.to_string(), "change password")?;

        let user = self.db.users.find_by_id(id).await?.or_not_found(ENTITY)?;

        if !auth.is_admin {
            let current = req.current_password.unwrap_or_default();
            if !password::verify_async(current, user.password_hash.clone()).await {
                warn!(user_id = %user.id, "Password change with wrong current password");
                return Err(AppError::Unauthenticated(
                    "current password is incorrect".to_string(),
                ));
            }
        }

        let password_hash = password::hash_async(new_password).await?;
        if !self.db.users.set_password(user.id, &password_hash).await? {
            return Err(AppError::not_found(ENTITY));
        }

        info!(target_user_id = %user.id, by_admin = auth.is_admin, "Password changed");
        Ok(())
    }

    /// Issues a one-hour reset token; only its hash is stored.
    pub(super) async fn forgot_password(
        &self,
        req: ForgotPasswordRequest,
    ) -> AppResult<ForgotPasswordResponse> {
        let user = self
            .find_by_email_or_username(req.email, req.username)
            .await?
            .or_not_found(ENTITY)?;

        let token = TokenGenerator::generate_reset_token();
        if !self
            .db
            .users
            .set_reset_token(user.id, &token.hash, token.expires_at)
            .await?
        {
            return Err(AppError::not_found(ENTITY));
        }

        info!(user_id = %user.id, expires_at = %token.expires_at, "Password reset requested");

        Ok(ForgotPasswordResponse {
            message: "Password reset token generated",
            reset_token: token.raw,
            expires_at: token.expires_at,
        })
    }

    /// Replaces a password by reset token, or by email/username when no token is sent.
    pub(super) async fn reset_password(&self, req: ResetPasswordRequest) -> AppResult<()> {
        let new_password = required_password("newPassword", req.new_password)?;
        validate_password_length(&new_password)?;

        let user = if let Some(token) = req.token.normalized() {
            let hash = TokenGenerator::hash_token(&token);
            self.db
                .users
                .consume_reset_token(&hash, Utc::now())
                .await?
                .ok_or_else(AppError::token_invalid)?
        } else {
            self.find_by_email_or_username(req.email, req.username)
                .await?
                .or_not_found(ENTITY)?
        };

        let password_hash = password::hash_async(new_password).await?;
        if !self.db.users.set_password(user.id, &password_hash).await? {
            return Err(AppError::not_found(ENTITY));
        }

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}
