//! Burger House: REST backend for a fast-food ordering service.
//!
//! Catalog (products, menus), accounts and orders over a document store,
//! behind JWT bearer authentication.

pub mod config;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod startup;

pub use startup::{AppState, build_app};
