//! Order service: submission and listing.
//!
//! Organized by domain:
//! - `mod.rs` - `OrderService` and response views
//! - `handlers.rs` - Thin axum handlers
//! - `submission.rs` - Payload validation
//! - `catalog.rs` - Customer and item resolution for listings

mod catalog;
pub mod handlers;
mod submission;

use burger_core::{AppError, AppResult, AuthInfo};
use burger_db::{Database, Id, NewOrder, Order, OrderItem, OrderStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

pub use catalog::{CustomerDirectory, CustomerSummary, ItemCatalog, ItemSummary};

/// Order as listed: references resolved, `null` where dangling.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(rename = "_id")]
    pub id: Id,
    pub items: Vec<OrderItemView>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub customer: Option<CustomerSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemView {
    #[serde(flatten)]
    pub item: OrderItem,
    pub details: Option<ItemSummary>,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderView>,
}

/// Order service.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validates and persists an order for the caller.
    ///
    /// `totalPrice` is stored as sent and item references are not checked
    /// for existence.
    pub(super) async fn submit(&self, auth: &AuthInfo, payload: &Value) -> AppResult<Order> {
        let (raw_items, total_price) = submission::envelope(payload)?;

        let customer = self.customer(auth).await?;
        let items = submission::items(raw_items)?;

        let order = self
            .db
            .orders
            .create(NewOrder {
                customer,
                items,
                total_price,
            })
            .await?;

        info!(
            order_id = %order.id,
            customer = %order.customer,
            items = order.items.len(),
            total_price = order.total_price,
            "Order submitted"
        );
        Ok(order)
    }

    /// Own orders for customers, every order for admins; newest first.
    pub(super) async fn list(&self, auth: &AuthInfo) -> AppResult<OrderList> {
        let filter = if auth.is_admin {
            None
        } else {
            // A token for a non-id subject owns nothing.
            match auth.user_id.parse::<Id>() {
                Ok(id) => Some(id),
                Err(_) => return Ok(OrderList { orders: Vec::new() }),
            }
        };

        let orders = self.db.orders.list(filter).await?;
        let catalog = ItemCatalog::load(&self.db, &orders).await?;
        let customers = CustomerDirectory::load(&self.db, &orders).await?;
        debug!(count = orders.len(), all = auth.is_admin, "Orders listed");

        let orders = orders
            .into_iter()
            .map(|order| OrderView {
                id: order.id,
                items: order
                    .items
                    .into_iter()
                    .map(|item| OrderItemView {
                        details: catalog.resolve(item.item).cloned(),
                        item,
                    })
                    .collect(),
                total_price: order.total_price,
                status: order.status,
                customer: customers.resolve(order.customer).cloned(),
                created_at: order.created_at,
                updated_at: order.updated_at,
            })
            .collect();

        Ok(OrderList { orders })
    }

    /// The caller's id, provided the account still exists.
    async fn customer(&self, auth: &AuthInfo) -> AppResult<Id> {
        let id: Id = auth
            .user_id
            .parse()
            .map_err(|_| AppError::not_found("customer"))?;

        if self.db.users.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("customer"));
        }
        Ok(id)
    }
}
