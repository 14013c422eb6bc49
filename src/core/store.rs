//! Store business logic - Handles all store-related operations.
//!
//! Stores are created on the fly while entering a purchase and referenced by
//! every saved purchase. Deleting a store does not touch its purchases.

use crate::{
    entities::{Store, store},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all stores, ordered alphabetically by name.
pub async fn get_all_stores(db: &DatabaseConnection) -> Result<Vec<store::Model>> {
    Store::find()
        .order_by_asc(store::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific store by its unique ID.
pub async fn get_store_by_id(
    db: &DatabaseConnection,
    store_id: i64,
) -> Result<Option<store::Model>> {
    Store::find_by_id(store_id).one(db).await.map_err(Into::into)
}

/// Creates a new store, performing input validation.
///
/// # Errors
/// Returns an error if the store name is empty or the insert fails.
pub async fn create_store(
    db: &DatabaseConnection,
    name: String,
    address: Option<String>,
) -> Result<store::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Store name cannot be empty".to_string(),
        });
    }

    let store = store::ActiveModel {
        name: Set(name.trim().to_string()),
        address: Set(address.filter(|a| !a.trim().is_empty())),
        ..Default::default()
    };

    store.insert(db).await.map_err(Into::into)
}

/// Deletes a store. Existing purchases keep their store id; the ranking
/// report labels them "Desconhecido" from then on.
pub async fn delete_store(db: &DatabaseConnection, store_id: i64) -> Result<()> {
    let store = Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(Error::StoreNotFound { id: store_id })?;

    store.delete(db).await?;
    Ok(())
}
