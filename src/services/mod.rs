//! HTTP handlers and the domain services behind them.
//!
//! Organized by resource:
//! - `products.rs`, `menus.rs` - Catalog CRUD (public reads, admin writes)
//! - `users/` - Accounts, credentials and user management
//! - `orders/` - Order submission and listing

pub mod menus;
pub mod orders;
pub mod products;
pub mod users;

use burger_core::AppResult;
use burger_core::validation::validate_required;
use serde::Serialize;

pub use orders::OrderService;
pub use users::UserService;

/// Plain `{"message": ...}` confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Trimmed catalog title; blank or oversized titles are rejected.
pub(crate) fn catalog_title(raw: &str) -> AppResult<String> {
    let title = raw.trim();
    validate_required("title", title)?;
    Ok(title.to_string())
}
