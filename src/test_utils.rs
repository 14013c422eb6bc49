//! Shared test utilities for `GroceryBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    core::purchase::ItemInput,
    core::store,
    entities::{purchase, purchase_item},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test store with no address.
pub async fn create_test_store(
    db: &DatabaseConnection,
    name: &str,
) -> Result<crate::entities::store::Model> {
    store::create_store(db, name.to_string(), None).await
}

/// Sets up a complete test environment with a store.
/// Returns (db, store) for common test scenarios.
pub async fn setup_with_store() -> Result<(DatabaseConnection, crate::entities::store::Model)> {
    let db = setup_test_db().await?;
    let store = create_test_store(&db, "Mercado Teste").await?;
    Ok((db, store))
}

/// Inserts a purchase header directly, bypassing the builder. Used by the
/// report and allowance tests, which only care about headers.
///
/// # Arguments
/// * `date` - purchase date as `YYYY-MM-DD`
/// * `payment_method` - `Some("va")`, `Some("personal")`, or `None` (legacy)
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    store_id: i64,
    date: &str,
    total: f64,
    payment_method: Option<&str>,
) -> Result<purchase::Model> {
    let model = purchase::ActiveModel {
        date: Set(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        store_id: Set(store_id),
        total: Set(total),
        payment_method: Set(payment_method.map(ToString::to_string)),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Inserts a purchase line item directly with sensible defaults
/// (category "Mercearia", unit "kg", no promotion).
pub async fn create_test_item(
    db: &DatabaseConnection,
    purchase_id: i64,
    product_name: &str,
    brand: Option<&str>,
    unit_price: f64,
    weight: f64,
    date: &str,
) -> Result<purchase_item::Model> {
    let model = purchase_item::ActiveModel {
        purchase_id: Set(purchase_id),
        product_name: Set(product_name.to_string()),
        brand: Set(brand.map(ToString::to_string)),
        category: Set("Mercearia".to_string()),
        weight: Set(weight),
        unit: Set("kg".to_string()),
        unit_price: Set(unit_price),
        promotion: Set(false),
        date: Set(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Builds an [`ItemInput`] with sensible defaults for builder tests
/// (category "Mercearia", unit "kg", no brand, no promotion).
pub fn priced_input(product_name: &str, package_price: f64, weight: Option<f64>) -> ItemInput {
    ItemInput {
        product_name: product_name.to_string(),
        brand: None,
        category: "Mercearia".to_string(),
        weight,
        unit: "kg".to_string(),
        package_price,
        promotion: false,
    }
}
