//! Category taxonomy management.
//!
//! The category table is an input-assistance source only. Purchase items
//! carry a snapshot string, so nothing here ever rewrites history: deleting
//! a category leaves every historic receipt untouched.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all categories, ordered alphabetically by name.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new category, rejecting empty and duplicate names.
pub async fn create_category(db: &DatabaseConnection, name: String) -> Result<category::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let existing = Category::find()
        .filter(category::Column::Name.eq(&name))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::Validation {
            message: format!("Category already exists: {name}"),
        });
    }

    let category = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    };

    category.insert(db).await.map_err(Into::into)
}

/// Deletes a category from the taxonomy. Historic purchase items keep their
/// snapshot text.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    Category::delete_by_id(category_id).exec(db).await?;
    Ok(())
}

/// Seeds the category table with the configured defaults, but only when the
/// table is empty. Safe to call on every startup.
pub async fn seed_categories(db: &DatabaseConnection, names: &[String]) -> Result<usize> {
    let existing = Category::find().count(db).await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        let category = category::ActiveModel {
            name: Set(name.trim().to_string()),
            ..Default::default()
        };
        category.insert(db).await?;
        inserted += 1;
    }

    info!("Seeded {inserted} default categories");
    Ok(inserted)
}
