//! Tower middleware for the REST API.
//!
//! # Middleware Order
//! When using `.layer()` on a router the layer added last is outermost:
//! - Request flows: outermost → innermost → handler
//! - Response flows: handler → innermost → outermost
//!
//! Global stack (see `startup::build_app`):
//! 1. RequestIdLayer - Extract/generate request ID first
//! 2. TraceLayer - Request span with `request_id` and `user_id` fields
//! 3. MetricsLayer - Count and time every request
//! 4. TimeoutLayer - Request timeout
//! 5. CorsLayer - CORS handling
//!
//! Per route (see `routes`), via `route_layer`:
//! 6. AuthLayer - Bearer token validation, injects `AuthInfo`
//! 7. AdminLayer - Rejects non-admin callers

pub mod admin;
pub mod auth;
pub mod metrics;
pub mod request_id;

pub use admin::AdminLayer;
pub use auth::AuthLayer;
pub use metrics::MetricsLayer;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
