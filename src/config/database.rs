//! Database configuration module.
//!
//! Handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL.

use crate::entities::{
    Category, MealAllowance, Product, Purchase, PurchaseItem, ShoppingList, ShoppingListItem,
    Store,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/grocery_buddy.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database.
///
/// Falls back to a default local `SQLite` file if no `DATABASE_URL`
/// environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let store_table = schema.create_table_from_entity(Store);
    let product_table = schema.create_table_from_entity(Product);
    let category_table = schema.create_table_from_entity(Category);
    let purchase_table = schema.create_table_from_entity(Purchase);
    let purchase_item_table = schema.create_table_from_entity(PurchaseItem);
    let shopping_list_table = schema.create_table_from_entity(ShoppingList);
    let shopping_list_item_table = schema.create_table_from_entity(ShoppingListItem);
    let meal_allowance_table = schema.create_table_from_entity(MealAllowance);

    db.execute(builder.build(&store_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&purchase_table)).await?;
    db.execute(builder.build(&purchase_item_table)).await?;
    db.execute(builder.build(&shopping_list_table)).await?;
    db.execute(builder.build(&shopping_list_item_table)).await?;
    db.execute(builder.build(&meal_allowance_table)).await?;

    Ok(())
}
