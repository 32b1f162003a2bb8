//! JWT authentication middleware for protected REST routes.
//!
//! Validates Bearer tokens and injects `AuthInfo` into request extensions.
//! Applied per route with `route_layer`, so public routes never see it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use burger_core::{AppError, AuthInfo, JwtError, JwtValidator};
use http::{Request, Response};
use tower::{Layer, Service};
use tracing::{Span, debug, warn};

/// Tower layer for JWT authentication.
#[derive(Clone)]
pub struct AuthLayer {
    validator: JwtValidator,
}

impl AuthLayer {
    #[must_use]
    pub const fn new(validator: JwtValidator) -> Self {
        Self { validator }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            validator: self.validator.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    validator: JwtValidator,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        match self.authenticate(&req) {
            Ok(auth_info) => {
                Span::current().record("user_id", auth_info.user_id.as_str());
                debug!(user_id = %auth_info.user_id, is_admin = auth_info.is_admin, "Authenticated");
                req.extensions_mut().insert(auth_info);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                if matches!(err, JwtError::InvalidToken(_) | JwtError::InvalidClaim(_)) {
                    warn!(error = %err, "Token verification failed");
                }
                let response =
                    AppError::Unauthenticated(err.client_message().to_string()).into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

impl<S> AuthMiddleware<S> {
    fn authenticate<T>(&self, req: &Request<T>) -> Result<AuthInfo, JwtError> {
        let header = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .ok_or(JwtError::MissingHeader)?
            .to_str()
            .map_err(|_| JwtError::InvalidFormat)?;

        let token = bearer_token(header).ok_or(JwtError::InvalidFormat)?;
        self.validator.validate(token)
    }
}

/// Token from a header of exactly two space-separated parts, the first `Bearer`.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_exact_scheme_and_two_parts() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), Some(""));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Token abc"), None);
        assert_eq!(bearer_token("Bearer abc extra"), None);
        assert_eq!(bearer_token("Bearer  abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
