//! In-process backend used by tests and local runs without a store.
//!
//! Mirrors the MongoDB backend's observable behavior, including the unique
//! username/email constraint and newest-first order listing.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use burger_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::DUPLICATE_USER;
use crate::{
    Id, Menu, MenuPatch, MenuRepository, NewMenu, NewOrder, NewProduct, NewUser, Order,
    OrderRepository, Product, ProductPatch, ProductRepository, ProductType, User, UserPatch,
    UserRepository,
};

#[derive(Default)]
struct Collections {
    users: RwLock<BTreeMap<Id, User>>,
    products: RwLock<BTreeMap<Id, Product>>,
    menus: RwLock<BTreeMap<Id, Menu>>,
    /// Insertion order.
    orders: RwLock<Vec<Order>>,
}

/// Memory-backed store. Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique(users: &BTreeMap<Id, User>, candidate: &User) -> AppResult<()> {
    let taken = users.values().any(|u| {
        u.id != candidate.id && (u.username == candidate.username || u.email == candidate.email)
    });
    if taken {
        return Err(AppError::invalid(DUPLICATE_USER));
    }
    Ok(())
}

fn pick<T: Clone>(map: &BTreeMap<Id, T>, ids: &[Id]) -> Vec<T> {
    ids.iter().filter_map(|id| map.get(id).cloned()).collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let user = user.into_user(Id::new());
        let mut users = self.inner.users.write();
        ensure_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Id) -> AppResult<Option<User>> {
        Ok(self.inner.users.read().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.inner.users.read();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.inner.users.read();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Id]) -> AppResult<Vec<User>> {
        Ok(pick(&self.inner.users.read(), ids))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.users.read().values().cloned().collect())
    }

    async fn update(&self, id: Id, patch: UserPatch) -> AppResult<Option<User>> {
        let mut users = self.inner.users.write();
        let Some(current) = users.get(&id) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        patch.apply(&mut updated);
        ensure_unique(&users, &updated)?;
        users.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn set_reset_token(
        &self,
        id: Id,
        hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut users = self.inner.users.write();
        Ok(users
            .get_mut(&id)
            .map(|user| {
                user.reset_token_hash = Some(hash.to_string());
                user.reset_token_expires_at = Some(expires_at);
            })
            .is_some())
    }

    async fn consume_reset_token(
        &self,
        hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut users = self.inner.users.write();
        let consumed = users
            .values_mut()
            .find(|user| user.reset_token_matches(hash, now))
            .map(|user| {
                user.reset_token_hash = None;
                user.reset_token_expires_at = None;
                user.clone()
            });
        Ok(consumed)
    }

    async fn set_password(&self, id: Id, password_hash: &str) -> AppResult<bool> {
        let mut users = self.inner.users.write();
        Ok(users
            .get_mut(&id)
            .map(|user| {
                user.password_hash = password_hash.to_string();
                user.reset_token_hash = None;
                user.reset_token_expires_at = None;
            })
            .is_some())
    }

    async fn delete(&self, id: Id) -> AppResult<bool> {
        Ok(self.inner.users.write().remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let product = product.into_product(Id::new());
        self.inner
            .products
            .write()
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Id) -> AppResult<Option<Product>> {
        Ok(self.inner.products.read().get(&id).cloned())
    }

    async fn list(&self, product_type: Option<ProductType>) -> AppResult<Vec<Product>> {
        let products = self.inner.products.read();
        Ok(products
            .values()
            .filter(|p| product_type.is_none_or(|t| p.product_type == Some(t)))
            .cloned()
            .collect())
    }

    async fn find_many(&self, ids: &[Id]) -> AppResult<Vec<Product>> {
        Ok(pick(&self.inner.products.read(), ids))
    }

    async fn update(&self, id: Id, patch: ProductPatch) -> AppResult<Option<Product>> {
        let mut products = self.inner.products.write();
        Ok(products.get_mut(&id).map(|product| {
            patch.apply(product);
            product.clone()
        }))
    }

    async fn delete(&self, id: Id) -> AppResult<bool> {
        Ok(self.inner.products.write().remove(&id).is_some())
    }
}

#[async_trait]
impl MenuRepository for MemoryStore {
    async fn create(&self, menu: NewMenu) -> AppResult<Menu> {
        let menu = menu.into_menu(Id::new());
        self.inner.menus.write().insert(menu.id, menu.clone());
        Ok(menu)
    }

    async fn find_by_id(&self, id: Id) -> AppResult<Option<Menu>> {
        Ok(self.inner.menus.read().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Menu>> {
        Ok(self.inner.menus.read().values().cloned().collect())
    }

    async fn find_many(&self, ids: &[Id]) -> AppResult<Vec<Menu>> {
        Ok(pick(&self.inner.menus.read(), ids))
    }

    async fn update(&self, id: Id, patch: MenuPatch) -> AppResult<Option<Menu>> {
        let mut menus = self.inner.menus.write();
        Ok(menus.get_mut(&id).map(|menu| {
            patch.apply(menu);
            menu.clone()
        }))
    }

    async fn delete(&self, id: Id) -> AppResult<bool> {
        Ok(self.inner.menus.write().remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let order = order.into_order(Id::new(), Utc::now());
        self.inner.orders.write().push(order.clone());
        Ok(order)
    }

    async fn list(&self, customer: Option<Id>) -> AppResult<Vec<Order>> {
        let orders = self.inner.orders.read();
        Ok(orders
            .iter()
            .rev()
            .filter(|o| customer.is_none_or(|c| o.customer == c))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{ItemRef, OrderItem, SelectedOptions};

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password_hash: "hash".into(),
            name: username.into(),
            email: email.into(),
            ..NewUser::default()
        }
    }

    fn new_order(customer: Id) -> NewOrder {
        NewOrder {
            customer,
            items: vec![OrderItem {
                item: ItemRef::Product(Id::new()),
                quantity: 1,
                selected_options: SelectedOptions::default(),
            }],
            total_price: 5.0,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_username_or_email() {
        let store = MemoryStore::new();
        let bob = UserRepository::create(&store, new_user("bob", "b@x.com")).await.unwrap();

        let err = UserRepository::create(&store, new_user("bob", "other@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), DUPLICATE_USER);

        let err = UserRepository::create(&store, new_user("robert", "b@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let alice = UserRepository::create(&store, new_user("alice", "a@x.com")).await.unwrap();
        let patch = UserPatch {
            username: Some("bob".into()),
            ..UserPatch::default()
        };
        assert!(UserRepository::update(&store, alice.id, patch).await.is_err());

        // Re-saving one's own values is not a collision.
        let patch = UserPatch {
            email: Some("b@x.com".into()),
            ..UserPatch::default()
        };
        assert!(UserRepository::update(&store, bob.id, patch).await.is_ok());
    }

    #[tokio::test]
    async fn reset_token_is_consumed_once() {
        let store = MemoryStore::new();
        let bob = UserRepository::create(&store, new_user("bob", "b@x.com")).await.unwrap();
        let now = Utc::now();

        store
            .set_reset_token(bob.id, "h", now + Duration::hours(1))
            .await
            .unwrap();

        let consumed = store.consume_reset_token("h", now).await.unwrap();
        assert_eq!(consumed.map(|u| u.id), Some(bob.id));
        assert!(store.consume_reset_token("h", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_reset_token_is_not_consumed() {
        let store = MemoryStore::new();
        let bob = UserRepository::create(&store, new_user("bob", "b@x.com")).await.unwrap();
        let now = Utc::now();

        store
            .set_reset_token(bob.id, "h", now - Duration::minutes(1))
            .await
            .unwrap();
        assert!(store.consume_reset_token("h", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn orders_list_newest_first_and_filter_by_customer() {
        let store = MemoryStore::new();
        let alice = Id::new();
        let bob = Id::new();

        let first = OrderRepository::create(&store, new_order(alice)).await.unwrap();
        let second = OrderRepository::create(&store, new_order(bob)).await.unwrap();
        let third = OrderRepository::create(&store, new_order(alice)).await.unwrap();

        let all: Vec<Id> = OrderRepository::list(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(all, vec![third.id, second.id, first.id]);

        let own: Vec<Id> = OrderRepository::list(&store, Some(alice))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(own, vec![third.id, first.id]);
    }

    #[tokio::test]
    async fn product_list_filters_by_type() {
        let store = MemoryStore::new();
        for (title, product_type) in [
            ("Classic", ProductType::Burger),
            ("Cola", ProductType::Drink),
            ("Double", ProductType::Burger),
        ] {
            ProductRepository::create(
                &store,
                NewProduct {
                    title: title.into(),
                    description: None,
                    price: Some(5.0),
                    in_stock: true,
                    image_src: None,
                    product_type: Some(product_type),
                },
            )
            .await
            .unwrap();
        }

        let burgers = ProductRepository::list(&store, Some(ProductType::Burger))
            .await
            .unwrap();
        assert_eq!(burgers.len(), 2);
        assert_eq!(ProductRepository::list(&store, None).await.unwrap().len(), 3);
    }
}
