//! Domain models and parameter types for the document store.
//!
//! Models serialize to the JSON shape clients see (`_id` as hex, camelCase
//! fields). Storage documents live in the MongoDB backend and convert to and
//! from these types.

use burger_core::JwtSubject;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

// =============================================================================
// Products
// =============================================================================

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Burger,
    Drink,
    Potato,
    Salad,
    Sauce,
    IceCream,
}

/// A product sold on its own or as part of a menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Id,
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

/// Parameters for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(rename = "type", default)]
    pub product_type: Option<ProductType>,
}

impl NewProduct {
    /// Materialize the product under a fresh id.
    #[must_use]
    pub fn into_product(self, id: Id) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            in_stock: self.in_stock,
            image_src: self.image_src,
            product_type: self.product_type,
        }
    }
}

/// Partial product update. `None` leaves the field untouched and is skipped
/// when serialized, so the serialized form is the set of changed fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
}

impl ProductPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.in_stock.is_none()
            && self.image_src.is_none()
            && self.product_type.is_none()
    }

    /// Merge the patch into an existing product.
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.price {
            product.price = Some(price);
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(image_src) = self.image_src {
            product.image_src = Some(image_src);
        }
        if let Some(product_type) = self.product_type {
            product.product_type = Some(product_type);
        }
    }
}

// =============================================================================
// Menus
// =============================================================================

/// Menu size, also selectable per order item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuSize {
    #[default]
    Medium,
    Large,
}

/// A bundle of products sold at its own stored price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    #[serde(rename = "_id")]
    pub id: Id,
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
    pub products: Vec<Id>,
}

/// Parameters for creating a menu.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenu {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: MenuSize,
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(default)]
    pub products: Vec<Id>,
}

impl NewMenu {
    /// Materialize the menu under a fresh id.
    #[must_use]
    pub fn into_menu(self, id: Id) -> Menu {
        Menu {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            size: self.size,
            image_src: self.image_src,
            products: self.products,
        }
    }
}

/// Partial menu update. `None` leaves the field untouched; product ids are
/// not serialized since their stored form is backend specific.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<MenuSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing)]
    pub products: Option<Vec<Id>>,
}

impl MenuPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.size.is_none()
            && self.image_src.is_none()
            && self.products.is_none()
    }

    /// Merge the patch into an existing menu.
    pub fn apply(self, menu: &mut Menu) {
        if let Some(title) = self.title {
            menu.title = title;
        }
        if let Some(description) = self.description {
            menu.description = Some(description);
        }
        if let Some(price) = self.price {
            menu.price = Some(price);
        }
        if let Some(size) = self.size {
            menu.size = size;
        }
        if let Some(image_src) = self.image_src {
            menu.image_src = Some(image_src);
        }
        if let Some(products) = self.products {
            menu.products = products;
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// Stored user account. Deliberately not `Serialize`: use [`UserProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_admin: bool,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
}

impl User {
    /// Client-facing view without credentials.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            surname: self.surname.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            zipcode: self.zipcode.clone(),
            city: self.city.clone(),
            date_of_birth: self.date_of_birth,
            is_admin: self.is_admin,
        }
    }

    /// Whether the stored reset token matches `hash` and is still valid at `now`.
    #[must_use]
    pub fn reset_token_matches(&self, hash: &str, now: DateTime<Utc>) -> bool {
        self.reset_token_hash.as_deref() == Some(hash)
            && self.reset_token_expires_at.is_some_and(|exp| exp > now)
    }
}

impl JwtSubject for User {
    fn subject_id(&self) -> String {
        self.id.to_string()
    }

    fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// User as returned to clients: never carries the password or reset token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Id,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub is_admin: bool,
}

/// Parameters for creating a user. The password is already hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_admin: bool,
}

impl NewUser {
    /// Materialize the user under a fresh id.
    #[must_use]
    pub fn into_user(self, id: Id) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            name: self.name,
            surname: self.surname,
            email: self.email,
            phone: self.phone,
            address: self.address,
            zipcode: self.zipcode,
            city: self.city,
            date_of_birth: self.date_of_birth,
            is_admin: self.is_admin,
            reset_token_hash: None,
            reset_token_expires_at: None,
        }
    }
}

/// Partial user update. Credentials are changed through dedicated operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    #[serde(default, deserialize_with = "flexible_date::deserialize")]
    pub date_of_birth: Option<NaiveDate>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.name.is_none()
            && self.surname.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.zipcode.is_none()
            && self.city.is_none()
            && self.date_of_birth.is_none()
            && self.is_admin.is_none()
    }

    /// Merge the patch into an existing user.
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(surname) = self.surname {
            user.surname = Some(surname);
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
        if let Some(zipcode) = self.zipcode {
            user.zipcode = Some(zipcode);
        }
        if let Some(city) = self.city {
            user.city = Some(city);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(is_admin) = self.is_admin {
            user.is_admin = is_admin;
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; blank means unset.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, de};

    /// Deserialize an optional date leniently.
    ///
    /// # Errors
    /// Fails when a non-blank value is neither a date nor an RFC 3339 timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        let Some(raw) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }

        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|_| de::Error::custom(format!("invalid date: {raw}")))
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order lifecycle status. No transitions are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processed,
    Ready,
}

/// Discriminator naming the collection an order item points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Product,
    Menu,
}

impl ItemKind {
    /// Parse the wire discriminator (`onModel`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Product" => Some(Self::Product),
            "Menu" => Some(Self::Menu),
            _ => None,
        }
    }
}

/// Polymorphic reference from an order item to a product or a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Product(Id),
    Menu(Id),
}

impl ItemRef {
    #[must_use]
    pub const fn new(kind: ItemKind, id: Id) -> Self {
        match kind {
            ItemKind::Product => Self::Product(id),
            ItemKind::Menu => Self::Menu(id),
        }
    }

    #[must_use]
    pub const fn id(self) -> Id {
        match self {
            Self::Product(id) | Self::Menu(id) => id,
        }
    }

    #[must_use]
    pub const fn kind(self) -> ItemKind {
        match self {
            Self::Product(_) => ItemKind::Product,
            Self::Menu(_) => ItemKind::Menu,
        }
    }
}

/// Options chosen for an order item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<MenuSize>,
}

/// One line of an order. Serialized as `{itemRef, onModel, quantity, selectedOptions}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OrderItemRepr", into = "OrderItemRepr")]
pub struct OrderItem {
    pub item: ItemRef,
    pub quantity: u32,
    pub selected_options: SelectedOptions,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemRepr {
    item_ref: Id,
    on_model: ItemKind,
    quantity: u32,
    #[serde(default)]
    selected_options: SelectedOptions,
}

impl From<OrderItemRepr> for OrderItem {
    fn from(repr: OrderItemRepr) -> Self {
        Self {
            item: ItemRef::new(repr.on_model, repr.item_ref),
            quantity: repr.quantity,
            selected_options: repr.selected_options,
        }
    }
}

impl From<OrderItem> for OrderItemRepr {
    fn from(item: OrderItem) -> Self {
        Self {
            item_ref: item.item.id(),
            on_model: item.item.kind(),
            quantity: item.quantity,
            selected_options: item.selected_options,
        }
    }
}

/// A submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Id,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub customer: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for persisting an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: Id,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
}

impl NewOrder {
    /// Materialize the order under a fresh id, stamped at `now`.
    #[must_use]
    pub fn into_order(self, id: Id, now: DateTime<Utc>) -> Order {
        Order {
            id,
            items: self.items,
            total_price: self.total_price,
            status: OrderStatus::Pending,
            customer: self.customer,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn order_item_uses_discriminator_wire_shape() {
        let id: Id = "65f1c0ffee0000000000abcd".parse().unwrap();
        let item = OrderItem {
            item: ItemRef::Menu(id),
            quantity: 2,
            selected_options: SelectedOptions {
                size: Some(MenuSize::Large),
            },
        };

        let value = serde_json::to_value(item).unwrap();
        assert_eq!(
            value,
            json!({
                "itemRef": "65f1c0ffee0000000000abcd",
                "onModel": "Menu",
                "quantity": 2,
                "selectedOptions": {"size": "large"}
            })
        );
    }

    #[test]
    fn profile_never_exposes_credentials() {
        let user = NewUser {
            username: "bob".into(),
            password_hash: "$argon2id$secret".into(),
            name: "Bob".into(),
            email: "b@x.com".into(),
            ..NewUser::default()
        }
        .into_user(Id::new());

        let value = serde_json::to_value(user.profile()).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("resetTokenHash").is_none());
        assert_eq!(value["username"], "bob");
        assert_eq!(value["isAdmin"], false);
    }

    #[test]
    fn reset_token_match_requires_unexpired_hash() {
        let now = Utc::now();
        let mut user = NewUser::default().into_user(Id::new());
        assert!(!user.reset_token_matches("h", now));

        user.reset_token_hash = Some("h".into());
        user.reset_token_expires_at = Some(now + chrono::Duration::minutes(5));
        assert!(user.reset_token_matches("h", now));
        assert!(!user.reset_token_matches("other", now));
        assert!(!user.reset_token_matches("h", now + chrono::Duration::minutes(10)));
    }

    #[test]
    fn user_patch_accepts_date_formats() {
        let patch: UserPatch = serde_json::from_value(json!({"dateOfBirth": "1990-05-17"})).unwrap();
        assert_eq!(patch.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 17));

        let patch: UserPatch =
            serde_json::from_value(json!({"dateOfBirth": "1990-05-17T00:00:00.000Z"})).unwrap();
        assert_eq!(patch.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 17));

        assert!(serde_json::from_value::<UserPatch>(json!({"dateOfBirth": "yesterday"})).is_err());
    }

    #[test]
    fn product_patch_merges_only_present_fields() {
        let mut product = NewProduct {
            title: "Classic".into(),
            description: Some("Beef".into()),
            price: Some(8.5),
            in_stock: false,
            image_src: None,
            product_type: Some(ProductType::Burger),
        }
        .into_product(Id::new());

        ProductPatch {
            price: Some(9.0),
            in_stock: Some(true),
            ..ProductPatch::default()
        }
        .apply(&mut product);

        assert_eq!(product.title, "Classic");
        assert_eq!(product.price, Some(9.0));
        assert!(product.in_stock);
        assert_eq!(product.description.as_deref(), Some("Beef"));
    }
}
