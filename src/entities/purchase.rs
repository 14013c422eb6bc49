//! Purchase entity - Represents a completed trip to a store.
//!
//! Each purchase has a date, a store reference, a derived total, and a
//! payment method. The total is always the sum of its line items'
//! `unit_price × weight` and is rewritten whenever items change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment method value for meal-allowance (vale alimentação) purchases.
pub const PAYMENT_MEAL_ALLOWANCE: &str = "va";
/// Payment method value for out-of-pocket purchases.
pub const PAYMENT_PERSONAL: &str = "personal";

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date the purchase happened
    pub date: Date,
    /// ID of the store where the purchase happened
    pub store_id: i64,
    /// Derived total: sum of line items' `unit_price × weight`
    pub total: f64,
    /// `"va"` (meal allowance) or `"personal"`; `None` on legacy records,
    /// which are treated as `"va"`
    pub payment_method: Option<String>,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
    /// One purchase has many line items
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    Items,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
