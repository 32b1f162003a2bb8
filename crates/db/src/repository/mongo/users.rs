//! User repository over the `users` collection.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{DateTime as BsonDateTime, Document, doc};
use burger_core::AppResult;
use chrono::{DateTime, Utc};
use mongodb::Collection;
use mongodb::options::ReturnDocument;

use super::documents::{UserDoc, date_to_bson};
use super::{DbError, MongoStore, USERS, collect, object_ids};
use crate::{Id, NewUser, User, UserPatch, UserRepository};

impl MongoStore {
    fn users(&self) -> Collection<UserDoc> {
        self.collection(USERS)
    }

    async fn find_user(&self, filter: Document) -> AppResult<Option<User>> {
        let doc = self.users().find_one(filter).await.map_err(DbError)?;
        Ok(doc.map(User::from))
    }
}

/// `$set` document for the fields a patch carries.
fn user_set(patch: UserPatch) -> Document {
    let mut set = Document::new();
    let strings = [
        ("username", patch.username),
        ("name", patch.name),
        ("surname", patch.surname),
        ("email", patch.email),
        ("phone", patch.phone),
        ("address", patch.address),
        ("zipcode", patch.zipcode),
        ("city", patch.city),
    ];
    for (field, value) in strings {
        if let Some(value) = value {
            set.insert(field, value);
        }
    }
    if let Some(date) = patch.date_of_birth {
        set.insert("dateOfBirth", date_to_bson(date));
    }
    if let Some(is_admin) = patch.is_admin {
        set.insert("isAdmin", is_admin);
    }
    set
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let user = user.into_user(Id::new());
        self.users()
            .insert_one(UserDoc::from(&user))
            .await
            .map_err(DbError)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Id) -> AppResult<Option<User>> {
        self.find_user(doc! { "_id": ObjectId::from(id) }).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_user(doc! { "username": username }).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_user(doc! { "email": email }).await
    }

    async fn find_by_ids(&self, ids: &[Id]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": object_ids(ids) } })
            .await
            .map_err(DbError)?;
        collect(cursor).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let cursor = self.users().find(doc! {}).await.map_err(DbError)?;
        collect(cursor).await
    }

    async fn update(&self, id: Id, patch: UserPatch) -> AppResult<Option<User>> {
        if patch.is_empty() {
            return UserRepository::find_by_id(self, id).await;
        }

        let updated = self
            .users()
            .find_one_and_update(
                doc! { "_id": ObjectId::from(id) },
                doc! { "$set": user_set(patch) },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(DbError)?;

        Ok(updated.map(User::from))
    }

    async fn set_reset_token(
        &self,
        id: Id,
        hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": ObjectId::from(id) },
                doc! { "$set": {
                    "resetTokenHash": hash,
                    "resetTokenExpiresAt": BsonDateTime::from_chrono(expires_at),
                } },
            )
            .await
            .map_err(DbError)?;

        Ok(result.matched_count > 0)
    }

    async fn consume_reset_token(
        &self,
        hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let consumed = self
            .users()
            .find_one_and_update(
                doc! {
                    "resetTokenHash": hash,
                    "resetTokenExpiresAt": { "$gt": BsonDateTime::from_chrono(now) },
                },
                doc! { "$unset": { "resetTokenHash": "", "resetTokenExpiresAt": "" } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(DbError)?;

        Ok(consumed.map(User::from))
    }

    async fn set_password(&self, id: Id, password_hash: &str) -> AppResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": ObjectId::from(id) },
                doc! {
                    "$set": { "password": password_hash },
                    "$unset": { "resetTokenHash": "", "resetTokenExpiresAt": "" },
                },
            )
            .await
            .map_err(DbError)?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: Id) -> AppResult<bool> {
        let result = self
            .users()
            .delete_one(doc! { "_id": ObjectId::from(id) })
            .await
            .map_err(DbError)?;

        Ok(result.deleted_count > 0)
    }
}
