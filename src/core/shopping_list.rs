//! Shopping lists and the live-cart flow.
//!
//! A list starts as a plain checklist. While shopping, items are checked off
//! one by one with the price actually paid ("live cart"); `finish_shopping`
//! then turns the checked items into a persisted purchase and consumes the
//! list. Lists imported into a purchase draft are consumed by that save
//! instead (see `core::purchase`).

use crate::{
    core::purchase::{NewItem, insert_purchase_with_items},
    entities::{ShoppingList, ShoppingListItem, purchase, shopping_list, shopping_list_item},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Creates a new active shopping list.
pub async fn create_list(db: &DatabaseConnection, name: String) -> Result<shopping_list::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "List name cannot be empty".to_string(),
        });
    }

    let list = shopping_list::ActiveModel {
        name: Set(name.trim().to_string()),
        status: Set(shopping_list::STATUS_ACTIVE.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    list.insert(db).await.map_err(Into::into)
}

/// Retrieves all active lists, newest first.
pub async fn get_active_lists(db: &DatabaseConnection) -> Result<Vec<shopping_list::Model>> {
    ShoppingList::find()
        .filter(shopping_list::Column::Status.eq(shopping_list::STATUS_ACTIVE))
        .order_by_desc(shopping_list::Column::CreatedAt)
        .order_by_desc(shopping_list::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific list by its unique ID.
pub async fn get_list_by_id(
    db: &DatabaseConnection,
    list_id: i64,
) -> Result<Option<shopping_list::Model>> {
    ShoppingList::find_by_id(list_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the items of a list, in entry order.
pub async fn get_items_for_list(
    db: &DatabaseConnection,
    list_id: i64,
) -> Result<Vec<shopping_list_item::Model>> {
    ShoppingListItem::find()
        .filter(shopping_list_item::Column::ListId.eq(list_id))
        .order_by_asc(shopping_list_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a planned item to a list: unchecked, no price yet.
pub async fn add_list_item(
    db: &DatabaseConnection,
    list_id: i64,
    product_name: String,
    unit: String,
) -> Result<shopping_list_item::Model> {
    if product_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }
    get_list_by_id(db, list_id)
        .await?
        .ok_or(Error::ListNotFound { id: list_id })?;

    let item = shopping_list_item::ActiveModel {
        list_id: Set(list_id),
        product_name: Set(product_name.trim().to_string()),
        unit: Set(unit),
        checked: Set(false),
        price: Set(None),
        brand: Set(None),
        ..Default::default()
    };

    item.insert(db).await.map_err(Into::into)
}

/// Checks an item off while capturing the price paid and, optionally, the
/// brand picked. This is the live-cart step in the store aisle.
pub async fn capture_item_price(
    db: &DatabaseConnection,
    item_id: i64,
    price: f64,
    brand: Option<String>,
) -> Result<shopping_list_item::Model> {
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }

    let item = ShoppingListItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let mut active: shopping_list_item::ActiveModel = item.into();
    active.checked = Set(true);
    active.price = Set(Some(price));
    active.brand = Set(brand.filter(|b| !b.trim().is_empty()));

    active.update(db).await.map_err(Into::into)
}

/// Puts an item back on the shelf: clears the checked flag and the captured
/// price.
pub async fn uncheck_item(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<shopping_list_item::Model> {
    let item = ShoppingListItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let mut active: shopping_list_item::ActiveModel = item.into();
    active.checked = Set(false);
    active.price = Set(None);

    active.update(db).await.map_err(Into::into)
}

/// Renames a list.
pub async fn rename_list(
    db: &DatabaseConnection,
    list_id: i64,
    name: String,
) -> Result<shopping_list::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "List name cannot be empty".to_string(),
        });
    }

    let list = get_list_by_id(db, list_id)
        .await?
        .ok_or(Error::ListNotFound { id: list_id })?;

    let mut active: shopping_list::ActiveModel = list.into();
    active.name = Set(name.trim().to_string());

    active.update(db).await.map_err(Into::into)
}

/// Marks a list as completed without consuming it, dropping it from the
/// active listing. Its items stay readable until the list is deleted.
pub async fn complete_list(
    db: &DatabaseConnection,
    list_id: i64,
) -> Result<shopping_list::Model> {
    let list = get_list_by_id(db, list_id)
        .await?
        .ok_or(Error::ListNotFound { id: list_id })?;

    let mut active: shopping_list::ActiveModel = list.into();
    active.status = Set(shopping_list::STATUS_COMPLETED.to_string());

    active.update(db).await.map_err(Into::into)
}

/// Removes an item from a list.
pub async fn delete_list_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    ShoppingListItem::delete_by_id(item_id).exec(db).await?;
    Ok(())
}

/// Deletes a list together with all of its items.
pub async fn delete_list(db: &DatabaseConnection, list_id: i64) -> Result<()> {
    get_list_by_id(db, list_id)
        .await?
        .ok_or(Error::ListNotFound { id: list_id })?;

    let txn = db.begin().await?;
    delete_list_cascade(&txn, list_id).await?;
    txn.commit().await?;
    Ok(())
}

/// Deletes a list and its items on the given connection (normally an open
/// transaction).
pub(crate) async fn delete_list_cascade<C>(db: &C, list_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    ShoppingListItem::delete_many()
        .filter(shopping_list_item::Column::ListId.eq(list_id))
        .exec(db)
        .await?;
    ShoppingList::delete_many()
        .filter(shopping_list::Column::Id.eq(list_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Turns the checked items of a list into a persisted purchase dated today,
/// then consumes the list, all in one transaction.
///
/// Checked items keep their captured price as the unit price with weight 1
/// (the live-cart flow does not capture weights) and land in the "Outros"
/// category.
///
/// # Errors
/// - `ListNotFound` / `StoreNotFound` for unknown references
/// - `Validation` if no item is checked with a price, or the payment method
///   is unknown
pub async fn finish_shopping(
    db: &DatabaseConnection,
    list_id: i64,
    store_id: i64,
    payment_method: &str,
) -> Result<purchase::Model> {
    if payment_method != purchase::PAYMENT_MEAL_ALLOWANCE
        && payment_method != purchase::PAYMENT_PERSONAL
    {
        return Err(Error::Validation {
            message: format!("Unknown payment method: {payment_method}"),
        });
    }

    get_list_by_id(db, list_id)
        .await?
        .ok_or(Error::ListNotFound { id: list_id })?;

    let rows: Vec<NewItem> = get_items_for_list(db, list_id)
        .await?
        .into_iter()
        .filter(|item| item.checked)
        .filter_map(|item| {
            item.price.map(|price| NewItem {
                product_name: item.product_name,
                brand: item.brand,
                category: "Outros".to_string(),
                weight: 1.0,
                unit: item.unit,
                unit_price: price,
                promotion: false,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(Error::Validation {
            message: "No item was checked off with a price".to_string(),
        });
    }

    let txn = db.begin().await?;
    let saved = insert_purchase_with_items(
        &txn,
        store_id,
        Utc::now().date_naive(),
        payment_method,
        &rows,
    )
    .await?;
    delete_list_cascade(&txn, list_id).await?;
    txn.commit().await?;

    info!(
        purchase_id = saved.id,
        list_id, "live cart checked out and list consumed"
    );
    Ok(saved)
}
