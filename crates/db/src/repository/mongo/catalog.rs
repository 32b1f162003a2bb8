//! Product and menu repositories over the `products` and `menus` collections.

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use burger_core::{AppResult, ResultExt};
use mongodb::Collection;
use mongodb::options::ReturnDocument;

use super::documents::{MenuDoc, ProductDoc};
use super::{DbError, MENUS, MongoStore, PRODUCTS, collect, object_ids};
use crate::{
    Id, Menu, MenuPatch, MenuRepository, NewMenu, NewProduct, Product, ProductPatch,
    ProductRepository, ProductType,
};

impl MongoStore {
    fn products(&self) -> Collection<ProductDoc> {
        self.collection(PRODUCTS)
    }

    fn menus(&self) -> Collection<MenuDoc> {
        self.collection(MENUS)
    }
}

#[async_trait]
impl ProductRepository for MongoStore {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let product = product.into_product(Id::new());
        self.products()
            .insert_one(ProductDoc::from(&product))
            .await
            .map_err(DbError)?;
        Ok(product)
    }

    async fn find_by_id(&self, id: Id) -> AppResult<Option<Product>> {
        let doc = self
            .products()
            .find_one(doc! { "_id": ObjectId::from(id) })
            .await
            .map_err(DbError)?;
        Ok(doc.map(Product::from))
    }

    async fn list(&self, product_type: Option<ProductType>) -> AppResult<Vec<Product>> {
        let filter = match product_type {
            Some(product_type) => {
                let product_type =
                    bson::to_bson(&product_type).internal("Failed to encode product type")?;
                doc! { "type": product_type }
            }
            None => doc! {},
        };

        let cursor = self.products().find(filter).await.map_err(DbError)?;
        collect(cursor).await
    }

    async fn find_many(&self, ids: &[Id]) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .products()
            .find(doc! { "_id": { "$in": object_ids(ids) } })
            .await
            .map_err(DbError)?;
        collect(cursor).await
    }

    async fn update(&self, id: Id, patch: ProductPatch) -> AppResult<Option<Product>> {
        if patch.is_empty() {
            return ProductRepository::find_by_id(self, id).await;
        }

        let set = bson::to_document(&patch).internal("Failed to encode product update")?;
        let updated = self
            .products()
            .find_one_and_update(doc! { "_id": ObjectId::from(id) }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(DbError)?;

        Ok(updated.map(Product::from))
    }

    async fn delete(&self, id: Id) -> AppResult<bool> {
        let result = self
            .products()
            .delete_one(doc! { "_id": ObjectId::from(id) })
            .await
            .map_err(DbError)?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl MenuRepository for MongoStore {
    async fn create(&self, menu: NewMenu) -> AppResult<Menu> {
        let menu = menu.into_menu(Id::new());
        self.menus()
            .insert_one(MenuDoc::from(&menu))
            .await
            .map_err(DbError)?;
        Ok(menu)
    }

    async fn find_by_id(&self, id: Id) -> AppResult<Option<Menu>> {
        let doc = self
            .menus()
            .find_one(doc! { "_id": ObjectId::from(id) })
            .await
            .map_err(DbError)?;
        Ok(doc.map(Menu::from))
    }

    async fn list(&self) -> AppResult<Vec<Menu>> {
        let cursor = self.menus().find(doc! {}).await.map_err(DbError)?;
        collect(cursor).await
    }

    async fn find_many(&self, ids: &[Id]) -> AppResult<Vec<Menu>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .menus()
            .find(doc! { "_id": { "$in": object_ids(ids) } })
            .await
            .map_err(DbError)?;
        collect(cursor).await
    }

    async fn update(&self, id: Id, patch: MenuPatch) -> AppResult<Option<Menu>> {
        if patch.is_empty() {
            return MenuRepository::find_by_id(self, id).await;
        }

        let mut set = bson::to_document(&patch).internal("Failed to encode menu update")?;
        if let Some(products) = &patch.products {
            set.insert("products", object_ids(products));
        }

        let updated = self
            .menus()
            .find_one_and_update(doc! { "_id": ObjectId::from(id) }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(DbError)?;

        Ok(updated.map(Menu::from))
    }

    async fn delete(&self, id: Id) -> AppResult<bool> {
        let result = self
            .menus()
            .delete_one(doc! { "_id": ObjectId::from(id) })
            .await
            .map_err(DbError)?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MenuSize;

    #[test]
    fn product_patch_encodes_changed_fields_only() {
        let patch = ProductPatch {
            price: Some(9.5),
            product_type: Some(ProductType::IceCream),
            ..ProductPatch::default()
        };

        let set = bson::to_document(&patch).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_f64("price").unwrap(), 9.5);
        assert_eq!(set.get_str("type").unwrap(), "IceCream");
    }

    #[test]
    fn menu_patch_leaves_products_to_the_backend() {
        let patch = MenuPatch {
            size: Some(MenuSize::Large),
            products: Some(vec![Id::new()]),
            ..MenuPatch::default()
        };

        let set = bson::to_document(&patch).unwrap();
        assert_eq!(set.get_str("size").unwrap(), "large");
        assert!(set.get("products").is_none());
    }
}
