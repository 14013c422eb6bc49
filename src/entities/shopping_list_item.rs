//! Shopping list item entity - A planned product on a shopping list.
//!
//! In the live-cart flow an item is checked off while capturing the price
//! actually paid (and optionally the brand); until then `price` is `None`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shopping list item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_list_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the list this item belongs to
    pub list_id: i64,
    /// Product name as entered
    pub product_name: String,
    /// Unit of measure, `"un"` by default
    pub unit: String,
    /// Whether the item is already in the cart
    pub checked: bool,
    /// Price captured when the item was checked off; `None` while planned
    pub price: Option<f64>,
    /// Brand captured when the item was checked off
    pub brand: Option<String>,
}

/// Defines relationships between ShoppingListItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one list
    #[sea_orm(
        belongs_to = "super::shopping_list::Entity",
        from = "Column::ListId",
        to = "super::shopping_list::Column::Id"
    )]
    List,
}

impl Related<super::shopping_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::List.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
