//! Stored document shapes and their conversions to domain models.

use bson::DateTime as BsonDateTime;
use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::object_ids;
use crate::{
    ItemKind, ItemRef, Menu, MenuSize, Order, OrderItem, OrderStatus, Product, ProductType,
    SelectedOptions, User,
};

pub(super) fn date_to_bson(date: NaiveDate) -> BsonDateTime {
    BsonDateTime::from_chrono(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<BsonDateTime>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token_expires_at: Option<BsonDateTime>,
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        Self {
            id: doc.id.into(),
            username: doc.username,
            password_hash: doc.password,
            name: doc.name,
            surname: doc.surname,
            email: doc.email,
            phone: doc.phone,
            address: doc.address,
            zipcode: doc.zipcode,
            city: doc.city,
            date_of_birth: doc.date_of_birth.map(|d| d.to_chrono().date_naive()),
            is_admin: doc.is_admin,
            reset_token_hash: doc.reset_token_hash,
            reset_token_expires_at: doc.reset_token_expires_at.map(BsonDateTime::to_chrono),
        }
    }
}

impl From<&User> for UserDoc {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.into(),
            username: user.username.clone(),
            password: user.password_hash.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            zipcode: user.zipcode.clone(),
            city: user.city.clone(),
            date_of_birth: user.date_of_birth.map(date_to_bson),
            is_admin: user.is_admin,
            reset_token_hash: user.reset_token_hash.clone(),
            reset_token_expires_at: user.reset_token_expires_at.map(BsonDateTime::from_chrono),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
}

impl From<ProductDoc> for Product {
    fn from(doc: ProductDoc) -> Self {
        Self {
            id: doc.id.into(),
            title: doc.title,
            description: doc.description,
            price: doc.price,
            in_stock: doc.in_stock,
            image_src: doc.image_src,
            product_type: doc.product_type,
        }
    }
}

impl From<&Product> for ProductDoc {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.into(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            in_stock: product.in_stock,
            image_src: product.image_src.clone(),
            product_type: product.product_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MenuDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: MenuSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default)]
    pub products: Vec<ObjectId>,
}

impl From<MenuDoc> for Menu {
    fn from(doc: MenuDoc) -> Self {
        Self {
            id: doc.id.into(),
            title: doc.title,
            description: doc.description,
            price: doc.price,
            size: doc.size,
            image_src: doc.image_src,
            products: doc.products.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&Menu> for MenuDoc {
    fn from(menu: &Menu) -> Self {
        Self {
            id: menu.id.into(),
            title: menu.title.clone(),
            description: menu.description.clone(),
            price: menu.price,
            size: menu.size,
            image_src: menu.image_src.clone(),
            products: object_ids(&menu.products),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrderItemDoc {
    pub item_ref: ObjectId,
    pub on_model: ItemKind,
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: SelectedOptions,
}

impl From<OrderItemDoc> for OrderItem {
    fn from(doc: OrderItemDoc) -> Self {
        Self {
            item: ItemRef::new(doc.on_model, doc.item_ref.into()),
            quantity: doc.quantity,
            selected_options: doc.selected_options,
        }
    }
}

impl From<&OrderItem> for OrderItemDoc {
    fn from(item: &OrderItem) -> Self {
        Self {
            item_ref: item.item.id().into(),
            on_model: item.item.kind(),
            quantity: item.quantity,
            selected_options: item.selected_options,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrderDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub items: Vec<OrderItemDoc>,
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    pub customer: ObjectId,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl From<OrderDoc> for Order {
    fn from(doc: OrderDoc) -> Self {
        Self {
            id: doc.id.into(),
            items: doc.items.into_iter().map(Into::into).collect(),
            total_price: doc.total_price,
            status: doc.status,
            customer: doc.customer.into(),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

impl From<&Order> for OrderDoc {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.into(),
            items: order.items.iter().map(Into::into).collect(),
            total_price: order.total_price,
            status: order.status,
            customer: order.customer.into(),
            created_at: BsonDateTime::from_chrono(order.created_at),
            updated_at: BsonDateTime::from_chrono(order.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Id, NewUser};

    #[test]
    fn user_doc_stores_hash_under_password_field() {
        let user = NewUser {
            username: "bob".into(),
            password_hash: "$argon2id$hash".into(),
            name: "Bob".into(),
            email: "b@x.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17),
            ..NewUser::default()
        }
        .into_user(Id::new());

        let doc = bson::to_document(&UserDoc::from(&user)).unwrap();
        assert_eq!(doc.get_str("password").unwrap(), "$argon2id$hash");
        assert!(doc.get("resetTokenHash").is_none());

        let back: User = bson::from_document::<UserDoc>(doc).map(Into::into).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn order_item_doc_keeps_discriminator() {
        let item = OrderItem {
            item: ItemRef::Product(Id::new()),
            quantity: 3,
            selected_options: SelectedOptions::default(),
        };

        let doc = bson::to_document(&OrderItemDoc::from(&item)).unwrap();
        assert_eq!(doc.get_str("onModel").unwrap(), "Product");
        assert_eq!(doc.get_object_id("itemRef").unwrap(), item.item.id().object_id());
    }
}
