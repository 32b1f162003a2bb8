//! Request metrics middleware.
//!
//! Records request count and duration using the `metrics` crate (rendered by
//! the Prometheus exporter on `/metrics`).
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `http_requests_total` | Counter | `method`, `path`, `status` |
//! | `http_request_duration_seconds` | Histogram | `method`, `path`, `status` |
//!
//! `path` is the route template: dynamic segments become `{id}` and paths
//! outside the API are bucketed as `/*` to keep label cardinality bounded.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{Request, Response};
use tower::{Layer, Service};

/// Infrastructure paths reported verbatim.
const KNOWN_PATHS: &[&str] = &["/", "/health", "/health/live", "/health/ready", "/metrics"];

/// Static segments of API routes. Anything else is a path parameter.
const API_SEGMENTS: &[&str] = &[
    "api",
    "products",
    "menus",
    "users",
    "orders",
    "add",
    "modify",
    "delete",
    "register",
    "login",
    "change-password",
    "forgot-password",
    "reset-password",
];

/// Deepest API route: `/api/products/modify/{id}`.
const MAX_API_SEGMENTS: usize = 4;

/// Tower layer for request metrics collection.
#[derive(Clone, Copy, Default)]
pub struct MetricsLayer;

impl MetricsLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Metrics middleware service.
#[derive(Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let path = normalize_path(req.uri().path());
        let start = Instant::now();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(req).await?;

            let labels = [
                ("method", method),
                ("path", path),
                ("status", response.status().as_u16().to_string()),
            ];
            metrics::counter!("http_requests_total", &labels).increment(1);
            metrics::histogram!("http_request_duration_seconds", &labels)
                .record(start.elapsed().as_secs_f64());

            Ok(response)
        })
    }
}

/// Map a request path to its route template.
fn normalize_path(path: &str) -> String {
    if KNOWN_PATHS.contains(&path) {
        return path.to_string();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    if segments.first() != Some(&"api") || segments.len() > MAX_API_SEGMENTS {
        return "/*".to_string();
    }

    segments
        .iter()
        .map(|seg| {
            if API_SEGMENTS.contains(seg) {
                *seg
            } else {
                "{id}"
            }
        })
        .fold(String::new(), |mut acc, seg| {
            acc.push('/');
            acc.push_str(seg);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_pass_through() {
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/metrics"), "/metrics");
        assert_eq!(normalize_path("/api/products"), "/api/products");
        assert_eq!(normalize_path("/api/users/login"), "/api/users/login");
    }

    #[test]
    fn ids_become_placeholders() {
        assert_eq!(
            normalize_path("/api/products/65f1c0ffee0000000000abcd"),
            "/api/products/{id}"
        );
        assert_eq!(
            normalize_path("/api/users/change-password/65f1c0ffee0000000000abcd"),
            "/api/users/change-password/{id}"
        );
    }

    #[test]
    fn unknown_paths_bucketed() {
        assert_eq!(normalize_path("/favicon.ico"), "/*");
        assert_eq!(normalize_path("/api/a/b/c/d/e"), "/*");
    }
}
