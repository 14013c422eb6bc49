//! Meal allowance entity - Monthly vale-alimentação credits.
//!
//! One record per `YYYY-MM` month key; recording the same month again
//! overwrites the amount instead of accumulating.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal allowance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_allowances")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Month key in `YYYY-MM` form (e.g., `"2025-07"`)
    #[sea_orm(unique)]
    pub month_year: String,
    /// Amount credited for that month
    pub amount: f64,
}

/// Meal allowances have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
