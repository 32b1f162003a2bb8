//! Admin gate for routes that mutate the catalog or manage users.
//!
//! Must run after `AuthLayer`: it only reads the injected `AuthInfo`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use burger_core::RequestAuthExt;
use http::{Request, Response};
use tower::{Layer, Service};
use tracing::debug;

/// Tower layer rejecting callers without the admin flag.
#[derive(Clone, Copy, Default)]
pub struct AdminLayer;

impl AdminLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for AdminLayer {
    type Service = AdminMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AdminMiddleware { inner }
    }
}

/// Admin gate service.
#[derive(Clone)]
pub struct AdminMiddleware<S> {
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AdminMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if let Err(err) = req.extensions().auth_admin() {
            debug!(path = req.uri().path(), "Admin privileges required");
            let response = err.into_response();
            return Box::pin(async move { Ok(response) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
