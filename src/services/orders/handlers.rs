//! axum handlers for `/api/orders`.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use burger_core::{AppResult, AuthInfo};
use burger_db::Order;
use serde_json::Value;
use tracing::instrument;

use super::OrderList;
use crate::extract::JsonBody;
use crate::startup::AppState;

#[instrument(skip(state, auth), fields(user_id = %auth.user_id))]
pub async fn list(State(state): State<AppState>, auth: AuthInfo) -> AppResult<Json<OrderList>> {
    let orders = state.orders.list(&auth).await?;
    Ok(Json(orders))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.user_id))]
pub async fn add(
    State(state): State<AppState>,
    auth: AuthInfo,
    JsonBody(payload): JsonBody<Value>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.submit(&auth, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
