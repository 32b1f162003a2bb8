//! Order repository over the `orders` collection.

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use burger_core::AppResult;
use chrono::Utc;
use mongodb::Collection;

use super::documents::OrderDoc;
use super::{DbError, MongoStore, ORDERS, collect};
use crate::{Id, NewOrder, Order, OrderRepository};

impl MongoStore {
    fn orders(&self) -> Collection<OrderDoc> {
        self.collection(ORDERS)
    }
}

#[async_trait]
impl OrderRepository for MongoStore {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        // BSON dates carry millisecond precision; truncate so the returned
        // order matches what a later read yields.
        let now = bson::DateTime::from_chrono(Utc::now()).to_chrono();
        let order = order.into_order(Id::new(), now);

        self.orders()
            .insert_one(OrderDoc::from(&order))
            .await
            .map_err(DbError)?;
        Ok(order)
    }

    async fn list(&self, customer: Option<Id>) -> AppResult<Vec<Order>> {
        let filter = match customer {
            Some(customer) => doc! { "customer": ObjectId::from(customer) },
            None => doc! {},
        };

        let cursor = self
            .orders()
            .find(filter)
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await
            .map_err(DbError)?;
        collect(cursor).await
    }
}
