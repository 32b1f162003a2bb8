//! MongoDB backend.

mod catalog;
mod documents;
mod orders;
mod users;

use bson::doc;
use bson::oid::ObjectId;
use burger_core::AppError;
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database as MongoDatabase, IndexModel};
use serde::de::DeserializeOwned;

use super::{DUPLICATE_USER, StoreConfig};
use crate::Id;

const USERS: &str = "users";
const PRODUCTS: &str = "products";
const MENUS: &str = "menus";
const ORDERS: &str = "orders";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Store error wrapper for ergonomic error conversion.
///
/// Wraps `mongodb::error::Error` to enable automatic conversion to `AppError`
/// via the `?` operator throughout repository methods.
#[derive(Debug)]
struct DbError(mongodb::error::Error);

impl From<mongodb::error::Error> for DbError {
    #[inline]
    fn from(e: mongodb::error::Error) -> Self {
        Self(e)
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        if is_duplicate_key(&e.0) {
            Self::InvalidRequest(DUPLICATE_USER.to_string())
        } else {
            Self::Internal(format!("Store error: {}", e.0))
        }
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(ce) => ce.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn object_ids(ids: &[Id]) -> Vec<ObjectId> {
    ids.iter().copied().map(ObjectId::from).collect()
}

/// Connected MongoDB database handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    db: MongoDatabase,
}

impl MongoStore {
    /// Single connection attempt: parse the URI, bound server selection, ping.
    pub(super) async fn connect(config: &StoreConfig) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options
            .app_name
            .get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let db = client.database(&config.db_name);
        db.run_command(doc! { "ping": 1 }).await?;

        Ok(Self { client, db })
    }

    /// Unique username/email indexes and the order listing index.
    pub(super) async fn ensure_indexes(&self) -> Result<(), AppError> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.db
            .collection::<bson::Document>(USERS)
            .create_indexes([
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            ])
            .await
            .map_err(DbError)?;

        self.db
            .collection::<bson::Document>(ORDERS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "customer": 1, "createdAt": -1 })
                    .build(),
            )
            .await
            .map_err(DbError)?;

        Ok(())
    }

    pub(super) async fn ping(&self) -> Result<(), AppError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(DbError)?;
        Ok(())
    }

    pub(super) async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// Run a query and collect every document, converting into the domain model.
async fn collect<D, T>(cursor: mongodb::Cursor<D>) -> Result<Vec<T>, AppError>
where
    D: DeserializeOwned + Unpin + Send + Sync,
    T: From<D>,
{
    let docs: Vec<D> = cursor.try_collect().await.map_err(DbError)?;
    Ok(docs.into_iter().map(T::from).collect())
}
