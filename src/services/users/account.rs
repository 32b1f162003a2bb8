//! Account lifecycle: registration and login.

use burger_core::validation::{validate_email, validate_password};
use burger_core::{AppError, AppResult, OptionExt, OptionStrExt, password};
use burger_db::{NewUser, User, UserPatch, UserProfile, flexible_date};
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ENTITY, UserService, required, required_password};

/// Message for any username/password mismatch, so callers cannot enumerate accounts.
const INVALID_CREDENTIALS: &str = "invalid credentials";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "flexible_date::deserialize")]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserProfile,
}

/// Administrator account provisioned at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl UserService {
    /// Creates a non-admin account.
    pub(super) async fn register(&self, req: RegisterRequest) -> AppResult<RegisterResponse> {
        let username = required("username", req.username)?;
        let password = required_password("password", req.password)?;
        let email = required("email", req.email)?;
        let name = required("name", req.name)?;

        validate_password(&password)?;
        validate_email(&email)?;
        self.ensure_available(Some(&username), Some(&email), None)
            .await?;

        let password_hash = password::hash_async(password).await?;

        let user = self
            .db
            .users
            .create(NewUser {
                username,
                password_hash,
                name,
                surname: req.surname.normalized(),
                email,
                phone: req.phone.normalized(),
                address: req.address.normalized(),
                zipcode: req.zipcode.normalized(),
                city: req.city.normalized(),
                date_of_birth: req.date_of_birth,
                is_admin: false,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(RegisterResponse {
            message: "User registered successfully",
            user: user.profile(),
        })
    }

    /// Verifies credentials and issues a bearer token.
    pub(super) async fn login(&self, req: LoginRequest) -> AppResult<LoginResponse> {
        let (Some(username), Some(password)) = (
            req.username.normalized(),
            req.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::invalid("username and password are required"));
        };

        let Some(user) = self.db.users.find_by_username(&username).await? else {
            warn!(username = %username, "Login for unknown username");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        if !password::verify_async(password, user.password_hash.clone()).await {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.jwt.issue_token(&user)?;
        info!(user_id = %user.id, is_admin = user.is_admin, "User logged in");

        Ok(LoginResponse {
            message: "Login successful",
            token,
            user: user.profile(),
        })
    }

    /// Ensures the seeded administrator exists.
    ///
    /// A missing account is created with admin rights; an existing account
    /// with the same username is promoted. Its password is left untouched.
    pub async fn bootstrap_admin(&self, seed: AdminSeed) -> AppResult<User> {
        let username = required("username", Some(seed.username))?;
        let email = required("email", Some(seed.email))?;
        let password =
            required_password("password", Some(seed.password.expose_secret().to_string()))?;

        if let Some(existing) = self.db.users.find_by_username(&username).await? {
            if existing.is_admin {
                info!(user_id = %existing.id, "Administrator already provisioned");
                return Ok(existing);
            }

            let patch = UserPatch {
                is_admin: Some(true),
                ..UserPatch::default()
            };
            let user = self
                .db
                .users
                .update(existing.id, patch)
                .await?
                .or_not_found(ENTITY)?;
            info!(user_id = %user.id, "Existing user promoted to administrator");
            return Ok(user);
        }

        validate_password(&password)?;
        validate_email(&email)?;
        self.ensure_available(None, Some(&email), None).await?;

        let password_hash = password::hash_async(password).await?;
        let user = self
            .db
            .users
            .create(NewUser {
                name: username.clone(),
                username,
                password_hash,
                email,
                is_admin: true,
                ..NewUser::default()
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Administrator provisioned");
        Ok(user)
    }
}
