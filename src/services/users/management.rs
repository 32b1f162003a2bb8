//! User management: profile reads, updates and deletion.

use burger_core::validation::{validate_email, validate_required};
use burger_core::{AppError, AppResult, AuthInfo, OptionExt};
use burger_db::{Id, UserPatch, UserProfile};
use tracing::{info, warn};

use super::{ENTITY, UserService};

impl UserService {
    /// Lists every account (admin).
    pub(super) async fn list_users(&self) -> AppResult<Vec<UserProfile>> {
        let users = self.db.users.list().await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }

    /// Fetches one profile (self or admin).
    pub(super) async fn get_user(&self, auth: &AuthInfo, id: Id) -> AppResult<UserProfile> {
        auth.require_access(&id.to_string(), "view profile")?;

        let user = self.db.users.find_by_id(id).await?.or_not_found(ENTITY)?;
        Ok(user.profile())
    }

    /// Applies a partial profile update (self or admin).
    pub(super) async fn update_user(
        &self,
        auth: &AuthInfo,
        id: Id,
        patch: UserPatch,
    ) -> AppResult<UserProfile> {
        auth.require_access(&id.to_string(), "update profile")?;

        if patch.is_admin.is_some() && !auth.is_admin {
            warn!(user_id = %auth.user_id, "Non-admin attempted to change admin status");
            return Err(AppError::Forbidden(
                "only admins can change admin status".to_string(),
            ));
        }

        let patch = normalize_patch(patch)?;
        self.ensure_available(patch.username.as_deref(), patch.email.as_deref(), Some(id))
            .await?;

        let user = self
            .db
            .users
            .update(id, patch)
            .await?
            .or_not_found(ENTITY)?;

        info!(target_user_id = %user.id, "User updated");
        Ok(user.profile())
    }

    /// Deletes an account (admin).
    pub(super) async fn delete_user(&self, id: Id) -> AppResult<()> {
        if !self.db.users.delete(id).await? {
            return Err(AppError::not_found(ENTITY));
        }

        info!(target_user_id = %id, "User deleted");
        Ok(())
    }
}

/// Trims the identifying fields and validates what a profile must keep.
fn normalize_patch(mut patch: UserPatch) -> AppResult<UserPatch> {
    if let Some(username) = patch.username.take() {
        validate_required("username", &username)?;
        patch.username = Some(username.trim().to_string());
    }
    if let Some(name) = patch.name.take() {
        validate_required("name", &name)?;
        patch.name = Some(name.trim().to_string());
    }
    if let Some(email) = patch.email.take() {
        let email = email.trim().to_string();
        validate_email(&email)?;
        patch.email = Some(email);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_identity_fields_are_trimmed_and_validated() {
        let patch = normalize_patch(UserPatch {
            username: Some(" bob ".into()),
            email: Some(" bob@example.com ".into()),
            city: Some("Lyon".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.username.as_deref(), Some("bob"));
        assert_eq!(patch.email.as_deref(), Some("bob@example.com"));
        assert_eq!(patch.city.as_deref(), Some("Lyon"));

        assert!(
            normalize_patch(UserPatch {
                name: Some(" ".into()),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            normalize_patch(UserPatch {
                email: Some("not-an-email".into()),
                ..Default::default()
            })
            .is_err()
        );
    }
}
