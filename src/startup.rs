//! Server startup and wiring.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use burger_core::JwtValidator;
use burger_db::Database;
use burger_telemetry::PrometheusHandle;
use http::{HeaderName, HeaderValue, Request};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{Level, warn};

use crate::middleware::{MetricsLayer, REQUEST_ID_HEADER, RequestIdLayer};
use crate::routes::{api_routes, health_routes};
use crate::services::{OrderService, UserService};

/// Request timeout duration.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Origins always allowed, merged with `CORS_ORIGINS`.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://burger-house-front.vercel.app",
    "http://localhost:3000",
    "http://localhost:5173",
];

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtValidator,
    pub users: Arc<UserService>,
    pub orders: Arc<OrderService>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database, jwt: JwtValidator) -> Self {
        Self {
            users: Arc::new(UserService::new(db.clone(), jwt.clone())),
            orders: Arc::new(OrderService::new(db.clone())),
            db,
            jwt,
            metrics: None,
        }
    }

    /// Serve `/metrics` from this exporter handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Build the complete application: routes plus the global middleware stack.
pub fn build_app(state: AppState, cors_origins: Option<&str>) -> Router {
    let jwt = state.jwt.clone();
    let cors = build_cors(cors_origins);

    // Executes top-to-bottom on request
    let middleware = ServiceBuilder::new()
        .layer(RequestIdLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(MetricsLayer::new())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .layer(cors);

    health_routes()
        .merge(api_routes(&jwt))
        .with_state(state)
        .layer(middleware)
}

/// CORS for the built-in origins plus the configured ones; `*` allows any.
fn build_cors(extra: Option<&str>) -> CorsLayer {
    let configured: Vec<&str> = extra
        .into_iter()
        .flat_map(|o| o.split(','))
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect();

    let origin = if configured.contains(&"*") {
        AllowOrigin::any()
    } else {
        let mut origins: Vec<HeaderValue> = Vec::new();
        for origin in DEFAULT_CORS_ORIGINS.iter().chain(configured.iter()) {
            match HeaderValue::from_str(origin) {
                Ok(value) if !origins.contains(&value) => origins.push(value),
                Ok(_) => {}
                Err(_) => warn!(origin, "Ignoring invalid CORS origin"),
            }
        }
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_headers(Any)
        .allow_methods(Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
    use tower::{ServiceExt, service_fn};

    use super::*;

    async fn allowed_origin(cors: CorsLayer, origin: &str) -> Option<HeaderValue> {
        let svc = ServiceBuilder::new().layer(cors).service(service_fn(
            |_req: Request<Body>| async { Ok::<_, std::convert::Infallible>(http::Response::new(Body::empty())) },
        ));
        let req = Request::builder()
            .uri("/")
            .header(ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let res = svc.oneshot(req).await.unwrap();
        res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn defaults_merge_with_configured_origins() {
        let cors = build_cors(Some("https://admin.example.com, "));
        assert_eq!(
            allowed_origin(cors.clone(), "https://admin.example.com").await,
            Some(HeaderValue::from_static("https://admin.example.com"))
        );
        assert_eq!(
            allowed_origin(cors.clone(), "http://localhost:5173").await,
            Some(HeaderValue::from_static("http://localhost:5173"))
        );
        assert_eq!(allowed_origin(cors, "https://evil.example.com").await, None);
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        let cors = build_cors(Some("*"));
        assert_eq!(
            allowed_origin(cors, "https://anywhere.example.com").await,
            Some(HeaderValue::from_static("*"))
        );
    }
}
