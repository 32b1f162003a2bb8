//! REST routes and health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use burger_core::JwtValidator;
use serde::Serialize;

use crate::middleware::{AdminLayer, AuthLayer};
use crate::services::{menus, orders, products, users};
use crate::startup::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    const fn healthy() -> Self {
        Self {
            status: "healthy",
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            message: Some(message.into()),
        }
    }
}

/// Liveness body.
#[derive(Serialize)]
struct Status {
    status: &'static str,
}

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Banner served on `/`.
pub const BANNER: &str = "Welcome to the Burger Shop API!";

/// Public infrastructure routes: banner, probes and metrics.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/health", get(liveness_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
}

/// Resource routes under `/api`.
///
/// Protected routes get their auth layers through `route_layer`, so the
/// admin gate always runs after token validation.
pub fn api_routes(jwt: &JwtValidator) -> Router<AppState> {
    let auth = AuthLayer::new(jwt.clone());

    let product_routes = Router::new()
        .route("/", get(products::list))
        .route("/{id}", get(products::get))
        .route(
            "/add",
            post(products::add)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        )
        .route(
            "/modify/{id}",
            put(products::modify)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        )
        .route(
            "/delete/{id}",
            delete(products::delete)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        );

    let menu_routes = Router::new()
        .route("/", get(menus::list))
        .route("/{id}", get(menus::get))
        .route(
            "/add",
            post(menus::add)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        )
        .route(
            "/modify/{id}",
            put(menus::modify)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        )
        .route(
            "/delete/{id}",
            delete(menus::delete)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        );

    let user_routes = Router::new()
        .route("/register", post(users::handlers::register))
        .route("/login", post(users::handlers::login))
        .route("/forgot-password", post(users::handlers::forgot_password))
        .route("/reset-password", post(users::handlers::reset_password))
        .route(
            "/",
            get(users::handlers::list)
                .route_layer(AdminLayer::new())
                .route_layer(auth.clone()),
        )
        .route(
            "/{id}",
            get(users::handlers::get)
                .put(users::handlers::update)
                .route_layer(auth.clone())
                .merge(
                    delete(users::handlers::delete)
                        .route_layer(AdminLayer::new())
                        .route_layer(auth.clone()),
                ),
        )
        .route(
            "/change-password/{user_id}",
            put(users::handlers::change_password).route_layer(auth.clone()),
        );

    let order_routes = Router::new()
        .route("/", get(orders::handlers::list))
        .route("/add", post(orders::handlers::add))
        .route_layer(auth);

    Router::new()
        .nest("/api/products", product_routes)
        .nest("/api/menus", menu_routes)
        .nest("/api/users", user_routes)
        .nest("/api/orders", order_routes)
}

async fn liveness_handler() -> Json<Status> {
    Json(Status { status: "ok" })
}

async fn readiness_handler(State(state): State<AppState>) -> Response {
    let db_check = if state.db.health_check().await {
        CheckResult::healthy()
    } else {
        CheckResult::unhealthy("Database connection failed")
    };

    let healthy = db_check.status == "healthy";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        version: VERSION,
        checks: Some(HealthChecks { database: db_check }),
    };

    (status, Json(body)).into_response()
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics exporter not installed").into_response(),
    }
}
