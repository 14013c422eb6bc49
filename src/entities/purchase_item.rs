//! Purchase item entity - A single product line within a purchase.
//!
//! Items store the normalized per-unit price, never the package price, so
//! price history and lowest-price lookups compare like with like. The
//! `category` field is a snapshot string, not a foreign key: historic
//! receipts keep their text even if the category taxonomy changes later.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the purchase this item belongs to
    pub purchase_id: i64,
    /// Product name as entered (free text, not normalized to the catalog)
    pub product_name: String,
    /// Optional brand
    pub brand: Option<String>,
    /// Category snapshot at purchase time
    pub category: String,
    /// Weight or quantity in `unit` (positive; 1 when not given)
    pub weight: f64,
    /// Unit of measure: `"kg"`, `"g"`, `"L"`, `"ml"` or `"un"`
    pub unit: String,
    /// Normalized price per unit of measure
    pub unit_price: f64,
    /// Whether the item was bought on promotion
    pub promotion: bool,
    /// Date copied from the parent purchase at creation
    pub date: Date,
}

/// Defines relationships between PurchaseItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
