//! Read-time resolution of order references.
//!
//! Orders store bare ids for their customer and items. Listing resolves them
//! through lookup tables built with one batch query per collection.

use std::collections::{BTreeSet, HashMap};

use burger_core::AppResult;
use burger_db::{Database, Id, ItemRef, Menu, Order, Product, User};
use serde::Serialize;

/// Display summary of a referenced product or menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub title: String,
    pub price: Option<f64>,
}

impl From<Product> for ItemSummary {
    fn from(product: Product) -> Self {
        Self {
            title: product.title,
            price: product.price,
        }
    }
}

impl From<Menu> for ItemSummary {
    fn from(menu: Menu) -> Self {
        Self {
            title: menu.title,
            price: menu.price,
        }
    }
}

/// Customer fields exposed on an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    pub email: String,
}

impl From<User> for CustomerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Type-indexed lookup table: products by id, menus by id.
#[derive(Debug, Default)]
pub struct ItemCatalog {
    products: HashMap<Id, ItemSummary>,
    menus: HashMap<Id, ItemSummary>,
}

impl ItemCatalog {
    /// Loads every item referenced by `orders`.
    pub async fn load(db: &Database, orders: &[Order]) -> AppResult<Self> {
        let mut product_ids = BTreeSet::new();
        let mut menu_ids = BTreeSet::new();
        for item in orders.iter().flat_map(|o| &o.items) {
            match item.item {
                ItemRef::Product(id) => product_ids.insert(id),
                ItemRef::Menu(id) => menu_ids.insert(id),
            };
        }

        let mut catalog = Self::default();

        if !product_ids.is_empty() {
            let ids: Vec<Id> = product_ids.into_iter().collect();
            catalog.products = db
                .products
                .find_many(&ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p.into()))
                .collect();
        }

        if !menu_ids.is_empty() {
            let ids: Vec<Id> = menu_ids.into_iter().collect();
            catalog.menus = db
                .menus
                .find_many(&ids)
                .await?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect();
        }

        Ok(catalog)
    }

    /// Summary of the referenced item, `None` when it no longer exists.
    #[must_use]
    pub fn resolve(&self, item: ItemRef) -> Option<&ItemSummary> {
        match item {
            ItemRef::Product(id) => self.products.get(&id),
            ItemRef::Menu(id) => self.menus.get(&id),
        }
    }
}

/// Customers referenced by a batch of orders.
#[derive(Debug, Default)]
pub struct CustomerDirectory {
    customers: HashMap<Id, CustomerSummary>,
}

impl CustomerDirectory {
    pub async fn load(db: &Database, orders: &[Order]) -> AppResult<Self> {
        let ids: Vec<Id> = orders
            .iter()
            .map(|o| o.customer)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Self::default());
        }

        let customers = db
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.into()))
            .collect();
        Ok(Self { customers })
    }

    #[must_use]
    pub fn resolve(&self, id: Id) -> Option<&CustomerSummary> {
        self.customers.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use burger_db::{NewOrder, NewProduct, OrderItem, SelectedOptions};

    use super::*;

    fn item(item: ItemRef) -> OrderItem {
        OrderItem {
            item,
            quantity: 1,
            selected_options: SelectedOptions::default(),
        }
    }

    #[tokio::test]
    async fn resolves_by_kind_and_leaves_dangling_refs_empty() {
        let db = Database::in_memory();
        let burger = db
            .products
            .create(NewProduct {
                title: "Classic".into(),
                description: None,
                price: Some(8.5),
                in_stock: true,
                image_src: None,
                product_type: None,
            })
            .await
            .unwrap();

        let order = NewOrder {
            customer: Id::new(),
            items: vec![
                item(ItemRef::Product(burger.id)),
                item(ItemRef::Menu(burger.id)),
                item(ItemRef::Product(Id::new())),
            ],
            total_price: 8.5,
        }
        .into_order(Id::new(), chrono::Utc::now());

        let catalog = ItemCatalog::load(&db, std::slice::from_ref(&order))
            .await
            .unwrap();

        assert_eq!(
            catalog.resolve(order.items[0].item),
            Some(&ItemSummary {
                title: "Classic".into(),
                price: Some(8.5),
            })
        );
        assert_eq!(catalog.resolve(order.items[1].item), None);
        assert_eq!(catalog.resolve(order.items[2].item), None);

        let customers = CustomerDirectory::load(&db, &[order.clone()]).await.unwrap();
        assert_eq!(customers.resolve(order.customer), None);
    }
}
