//! Document store layer for the Burger House service.
//!
//! Provides:
//! - Typed domain models with their client-facing JSON shape
//! - Repository traits bundled in [`Database`]
//! - A MongoDB backend ([`connect`]) and an in-memory backend
//!
//! # Example
//!
//! ```ignore
//! use burger_db::{connect, Database, StoreConfig};
//!
//! let store = connect(&StoreConfig::from_uri("mongodb://localhost:27017")).await?;
//! let db = Database::mongo(store);
//!
//! let user = db.users.find_by_username("bob").await?;
//! ```

mod id;
mod models;
mod repository;

// =============================================================================
// Public exports - Identifiers
// =============================================================================

pub use id::{Id, InvalidId};

// =============================================================================
// Public exports - Domain models
// =============================================================================

pub use models::{
    ItemKind, ItemRef, Menu, MenuSize, Order, OrderItem, OrderStatus, Product, ProductType,
    SelectedOptions, User, UserProfile, flexible_date,
};

// =============================================================================
// Public exports - Parameter types
// =============================================================================

pub use models::{MenuPatch, NewMenu, NewOrder, NewProduct, NewUser, ProductPatch, UserPatch};

// =============================================================================
// Public exports - Repositories and config
// =============================================================================

pub use repository::{
    DUPLICATE_USER, Database, MemoryStore, MenuRepository, MongoStore, OrderRepository,
    ProductRepository, StoreConfig, UserRepository, connect, retry_with_delay,
};
