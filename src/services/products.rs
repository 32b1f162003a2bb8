//! Product catalog handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use burger_core::validation::validate_price;
use burger_core::{AppError, AppResult, OptionExt};
use burger_db::{NewProduct, Product, ProductPatch, ProductType};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{MessageResponse, catalog_title};
use crate::extract::{JsonBody, QueryParams, parse_id};
use crate::startup::AppState;

const ENTITY: &str = "Product";

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.db.products.list(query.product_type).await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id, ENTITY)?;
    let product = state.db.products.find_by_id(id).await?.or_not_found(ENTITY)?;
    Ok(Json(product))
}

#[instrument(skip(state, product), fields(title = %product.title))]
pub async fn add(
    State(state): State<AppState>,
    JsonBody(mut product): JsonBody<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    product.title = catalog_title(&product.title)?;
    validate_price(product.price)?;

    let product = state.db.products.create(product).await?;
    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, patch))]
pub async fn modify(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(mut patch): JsonBody<ProductPatch>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id, ENTITY)?;
    normalize_patch(&mut patch)?;

    let product = state.db.products.update(id, patch).await?.or_not_found(ENTITY)?;
    info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id, ENTITY)?;
    if !state.db.products.delete(id).await? {
        return Err(AppError::not_found(ENTITY));
    }

    info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

fn normalize_patch(patch: &mut ProductPatch) -> AppResult<()> {
    patch.title = patch.title.as_deref().map(catalog_title).transpose()?;
    validate_price(patch.price)
}
