//! Repository layer over the document store.
//!
//! # Error Handling
//!
//! All repository methods return `Result<T, AppError>` where errors are:
//! - `AppError::InvalidRequest` - Unique constraint violated (username/email)
//! - `AppError::Internal` - Store connection or query failures
//!
//! Absence is reported as `Ok(None)` / `Ok(false)`; handlers decide whether
//! that is a `NotFound`.

#![expect(
    clippy::missing_errors_doc,
    reason = "error handling documented at module level"
)]

mod config;
mod memory;
mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use burger_core::AppResult;
use chrono::{DateTime, Utc};

use crate::{
    Id, Menu, MenuPatch, NewMenu, NewOrder, NewProduct, NewUser, Order, Product, ProductPatch,
    ProductType, User, UserPatch,
};

pub use config::{StoreConfig, connect, retry_with_delay};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Message returned when a unique index rejects a user write.
pub const DUPLICATE_USER: &str = "username or email is already taken";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, id: Id) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Batch lookup; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Id]) -> AppResult<Vec<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Apply a partial update and return the updated user.
    async fn update(&self, id: Id, patch: UserPatch) -> AppResult<Option<User>>;

    /// Store a reset token hash and expiry. Returns `false` if the user is gone.
    async fn set_reset_token(
        &self,
        id: Id,
        hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Atomically find the user owning an unexpired `hash` and clear the token.
    async fn consume_reset_token(&self, hash: &str, now: DateTime<Utc>)
    -> AppResult<Option<User>>;

    /// Replace the password hash and clear any pending reset token.
    async fn set_password(&self, id: Id, password_hash: &str) -> AppResult<bool>;

    async fn delete(&self, id: Id) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    async fn find_by_id(&self, id: Id) -> AppResult<Option<Product>>;

    /// All products, optionally restricted to one type.
    async fn list(&self, product_type: Option<ProductType>) -> AppResult<Vec<Product>>;

    /// Batch lookup; missing ids are skipped.
    async fn find_many(&self, ids: &[Id]) -> AppResult<Vec<Product>>;

    async fn update(&self, id: Id, patch: ProductPatch) -> AppResult<Option<Product>>;

    async fn delete(&self, id: Id) -> AppResult<bool>;
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn create(&self, menu: NewMenu) -> AppResult<Menu>;

    async fn find_by_id(&self, id: Id) -> AppResult<Option<Menu>>;

    async fn list(&self) -> AppResult<Vec<Menu>>;

    /// Batch lookup; missing ids are skipped.
    async fn find_many(&self, ids: &[Id]) -> AppResult<Vec<Menu>>;

    async fn update(&self, id: Id, patch: MenuPatch) -> AppResult<Option<Menu>>;

    async fn delete(&self, id: Id) -> AppResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    /// Orders newest first, optionally restricted to one customer.
    async fn list(&self, customer: Option<Id>) -> AppResult<Vec<Order>>;
}

#[derive(Clone)]
enum Backend {
    Mongo(MongoStore),
    Memory,
}

/// Combined store context.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub orders: Arc<dyn OrderRepository>,
    backend: Backend,
}

impl Database {
    /// Repositories backed by a connected MongoDB database.
    #[must_use]
    pub fn mongo(store: MongoStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            products: Arc::new(store.clone()),
            menus: Arc::new(store.clone()),
            orders: Arc::new(store.clone()),
            backend: Backend::Mongo(store),
        }
    }

    /// Repositories backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            products: Arc::new(store.clone()),
            menus: Arc::new(store.clone()),
            orders: Arc::new(store),
            backend: Backend::Memory,
        }
    }

    /// Check store health with a ping.
    pub async fn health_check(&self) -> bool {
        match &self.backend {
            Backend::Mongo(store) => store.ping().await.is_ok(),
            Backend::Memory => true,
        }
    }

    /// Release store connections.
    pub async fn close(&self) {
        if let Backend::Mongo(store) = &self.backend {
            store.shutdown().await;
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            Backend::Mongo(_) => "mongo",
            Backend::Memory => "memory",
        };
        f.debug_struct("Database").field("backend", &backend).finish_non_exhaustive()
    }
}
