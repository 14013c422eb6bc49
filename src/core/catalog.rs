//! Catalog product management.
//!
//! Pre-registered products feed autocomplete and default category/unit when
//! entering purchase items. The catalog is fully independent of purchase
//! history; removing an entry never touches saved items.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all catalog products, ordered alphabetically by name.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Case-insensitive substring search over catalog product names.
///
/// Matching is done in memory so accented names ("Açúcar") compare
/// correctly regardless of case.
pub async fn search_products(db: &DatabaseConnection, term: &str) -> Result<Vec<product::Model>> {
    let term = term.trim().to_lowercase();
    let mut products = get_all_products(db).await?;
    products.retain(|p| p.name.to_lowercase().contains(&term));
    Ok(products)
}

/// Creates a new catalog product with its default category and unit.
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    category: String,
    unit: String,
) -> Result<product::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        category: Set(category),
        unit: Set(unit),
        ..Default::default()
    };

    product.insert(db).await.map_err(Into::into)
}

/// Removes a product from the catalog.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    Product::delete_by_id(product_id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    async fn add(db: &DatabaseConnection, name: &str) -> Result<product::Model> {
        create_product(db, name.to_string(), "Mercearia".to_string(), "un".to_string()).await
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add(&db, "  ").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_search_products_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;

        add(&db, "Açúcar Cristal").await?;
        add(&db, "Arroz").await?;
        add(&db, "Feijão").await?;

        let hits = search_products(&db, "AÇÚCAR").await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Açúcar Cristal");

        // Substring match, not prefix
        let hits = search_products(&db, "rroz").await?;
        assert_eq!(hits.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product() -> Result<()> {
        let db = setup_test_db().await?;

        let product = add(&db, "Arroz").await?;
        delete_product(&db, product.id).await?;
        assert!(get_all_products(&db).await?.is_empty());

        Ok(())
    }
}
