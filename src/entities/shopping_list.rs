//! Shopping list entity - A planning artifact for an upcoming trip.
//!
//! Lists are deleted, not archived, once their items have been imported into
//! a purchase and that purchase is saved.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status value for a list still being planned or shopped.
pub const STATUS_ACTIVE: &str = "active";
/// Status value for a finished list.
pub const STATUS_COMPLETED: &str = "completed";

/// Shopping list database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_lists")]
pub struct Model {
    /// Unique identifier for the list
    #[sea_orm(primary_key)]
    pub id: i64,
    /// List name (e.g., "Compras da Semana")
    pub name: String,
    /// `"active"` or `"completed"`
    pub status: String,
    /// When the list was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ShoppingList and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One list has many items
    #[sea_orm(has_many = "super::shopping_list_item::Entity")]
    Items,
}

impl Related<super::shopping_list_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
