//! Request extractors that report failures through `AppError`.
//!
//! axum's own rejections answer in plain text; wrapping them keeps every
//! client error in the `{"message": ...}` shape.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use burger_core::AppError;
use burger_db::Id;

/// JSON body extractor with `InvalidRequest` rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string extractor with `InvalidRequest` rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::invalid(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a path id; a malformed id names nothing that exists, so it is `NotFound`.
///
/// # Errors
/// Returns `AppError::NotFound` for `entity` when `raw` is not a valid id.
pub fn parse_id(raw: &str, entity: &str) -> Result<Id, AppError> {
    raw.parse().map_err(|_| AppError::not_found(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_not_found() {
        assert!(parse_id("65f1c0ffee0000000000abcd", "Product").is_ok());
        assert!(matches!(
            parse_id("X", "Product"),
            Err(AppError::NotFound(msg)) if msg == "Product not found"
        ));
    }
}
