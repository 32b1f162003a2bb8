//! axum handlers for `/api/users`.
//!
//! Thin handlers that extract auth/context and delegate to domain methods.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use burger_core::{AppResult, AuthInfo};
use burger_db::{UserPatch, UserProfile};
use tracing::instrument;

use super::{
    ChangePasswordRequest, ENTITY, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest,
};
use crate::extract::{JsonBody, parse_id};
use crate::services::MessageResponse;
use crate::startup::AppState;

// ============================================================================
// Account
// ============================================================================

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let response = state.users.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.users.login(req).await?;
    Ok(Json(response))
}

// ============================================================================
// User Management
// ============================================================================

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn list(
    State(state): State<AppState>,
    auth: AuthInfo,
) -> AppResult<Json<Vec<UserProfile>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn get(
    State(state): State<AppState>,
    auth: AuthInfo,
    Path(id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let id = parse_id(&id, ENTITY)?;
    let user = state.users.get_user(&auth, id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, auth, patch), fields(user_id = %auth.user_id))]
pub async fn update(
    State(state): State<AppState>,
    auth: AuthInfo,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> AppResult<Json<UserProfile>> {
    let id = parse_id(&id, ENTITY)?;
    let user = state.users.update_user(&auth, id, patch).await?;
    Ok(Json(user))
}

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthInfo,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, ENTITY)?;
    state.users.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// ============================================================================
// Passwords
// ============================================================================

#[instrument(skip(state, auth, req), fields(user_id = %auth.user_id))]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthInfo,
    Path(user_id): Path<String>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&user_id, ENTITY)?;
    state.users.change_password(&auth, id, req).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ForgotPasswordRequest>,
) -> AppResult<Json<ForgotPasswordResponse>> {
    let response = state.users.forgot_password(req).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.users.reset_password(req).await?;
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
