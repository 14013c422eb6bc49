//! Catalog product entity - Pre-registered products used for autocomplete.
//!
//! Catalog entries are independent of purchase history; they only provide
//! name suggestions and default category/unit when entering items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the catalog entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product name (e.g., "Arroz")
    pub name: String,
    /// Default category offered when this product is picked
    pub category: String,
    /// Default unit of measure offered when this product is picked
    pub unit: String,
}

/// Catalog products have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
