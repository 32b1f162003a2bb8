//! Menu catalog handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use burger_core::validation::validate_price;
use burger_core::{AppError, AppResult, OptionExt};
use burger_db::{Menu, MenuPatch, NewMenu};
use tracing::{info, instrument};

use super::{MessageResponse, catalog_title};
use crate::extract::{JsonBody, parse_id};
use crate::startup::AppState;

const ENTITY: &str = "Menu";

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Menu>>> {
    let menus = state.db.menus.list().await?;
    Ok(Json(menus))
}

#[instrument(skip(state))]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Menu>> {
    let id = parse_id(&id, ENTITY)?;
    let menu = state.db.menus.find_by_id(id).await?.or_not_found(ENTITY)?;
    Ok(Json(menu))
}

#[instrument(skip(state, menu), fields(title = %menu.title))]
pub async fn add(
    State(state): State<AppState>,
    JsonBody(mut menu): JsonBody<NewMenu>,
) -> AppResult<(StatusCode, Json<Menu>)> {
    menu.title = catalog_title(&menu.title)?;
    validate_price(menu.price)?;

    let menu = state.db.menus.create(menu).await?;
    info!(menu_id = %menu.id, products = menu.products.len(), "Menu created");
    Ok((StatusCode::CREATED, Json(menu)))
}

#[instrument(skip(state, patch))]
pub async fn modify(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(mut patch): JsonBody<MenuPatch>,
) -> AppResult<Json<Menu>> {
    let id = parse_id(&id, ENTITY)?;
    patch.title = patch.title.as_deref().map(catalog_title).transpose()?;
    validate_price(patch.price)?;

    let menu = state.db.menus.update(id, patch).await?.or_not_found(ENTITY)?;
    info!(menu_id = %menu.id, "Menu updated");
    Ok(Json(menu))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, ENTITY)?;
    if !state.db.menus.delete(id).await? {
        return Err(AppError::not_found(ENTITY));
    }

    info!(menu_id = %id, "Menu deleted");
    Ok(Json(MessageResponse::new("Menu deleted successfully")))
}
