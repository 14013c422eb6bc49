//! Spend analytics derived from purchase history.
//!
//! Every figure here is recomputed from the full history on each call; there
//! is no materialized view or cache. That is fine at household scale, but
//! callers should not assume O(1) cost.

use crate::{
    core::round2,
    entities::{Purchase, Store, purchase_item},
    errors::Result,
};
use sea_orm::prelude::*;
use std::collections::HashMap;

/// Spend total for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Sum of purchase totals in that month
    pub total: f64,
}

/// Spend total for one category (raw or macro).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Category label
    pub category: String,
    /// Sum of `unit_price × weight` over the category's items
    pub total: f64,
}

/// Spend profile of one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRanking {
    /// Store name, or "Desconhecido" when the store was deleted
    pub store_name: String,
    /// Number of purchases at this store
    pub purchase_count: u64,
    /// Sum of purchase totals
    pub total_spent: f64,
    /// `total_spent / purchase_count`
    pub average_spent: f64,
}

/// Static lookup grouping raw categories into chart-level macro buckets.
/// Anything unmapped lands in "Outros".
const MACRO_CATEGORIES: [(&str, &str); 7] = [
    ("Mercearia", "Alimentos"),
    ("Padaria", "Alimentos"),
    ("Hortifruti", "Alimentos"),
    ("Açougue", "Alimentos"),
    ("Bebidas", "Bebidas"),
    ("Higiene", "Casa e Higiene"),
    ("Limpeza", "Casa e Higiene"),
];

fn macro_category(raw: &str) -> &str {
    MACRO_CATEGORIES
        .iter()
        .find(|(from, _)| *from == raw)
        .map_or("Outros", |(_, to)| *to)
}

/// Groups all purchases by calendar month (of the purchase date) and sums
/// their totals. The result is sorted ascending by month key and holds
/// exactly one entry per distinct month.
pub async fn monthly_totals(db: &DatabaseConnection) -> Result<Vec<MonthlyTotal>> {
    let purchases = Purchase::find().all(db).await?;

    let mut by_month: HashMap<String, f64> = HashMap::new();
    for purchase in purchases {
        let key = purchase.date.format("%Y-%m").to_string();
        *by_month.entry(key).or_insert(0.0) += purchase.total;
    }

    let mut totals: Vec<MonthlyTotal> = by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month,
            total: round2(total),
        })
        .collect();
    totals.sort_by(|a, b| a.month.cmp(&b.month));
    Ok(totals)
}

/// Groups line items by their stored category snapshot and sums
/// `unit_price × weight`, sorted descending by total.
#[must_use]
pub fn category_totals(items: &[purchase_item::Model]) -> Vec<CategoryTotal> {
    sum_by_label(items.iter().map(|i| (i.category.clone(), i.unit_price * i.weight)))
}

/// Like [`category_totals`], after mapping each raw category through the
/// macro-category lookup table.
#[must_use]
pub fn macro_category_totals(items: &[purchase_item::Model]) -> Vec<CategoryTotal> {
    sum_by_label(items.iter().map(|i| {
        (
            macro_category(&i.category).to_string(),
            i.unit_price * i.weight,
        )
    }))
}

fn sum_by_label(entries: impl Iterator<Item = (String, f64)>) -> Vec<CategoryTotal> {
    let mut by_label: HashMap<String, f64> = HashMap::new();
    for (label, amount) in entries {
        *by_label.entry(label).or_insert(0.0) += amount;
    }

    let mut totals: Vec<CategoryTotal> = by_label
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category,
            total: round2(total),
        })
        .collect();
    // Descending by total; name breaks ties so the order is stable
    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Ranks stores by average spend per purchase, cheapest first. Stores with
/// no purchases are absent; purchases whose store was deleted are kept under
/// "Desconhecido".
pub async fn store_ranking(db: &DatabaseConnection) -> Result<Vec<StoreRanking>> {
    let purchases = Purchase::find().all(db).await?;
    let stores = Store::find().all(db).await?;

    let mut by_store: HashMap<i64, (f64, u64)> = HashMap::new();
    for purchase in purchases {
        let entry = by_store.entry(purchase.store_id).or_insert((0.0, 0));
        entry.0 += purchase.total;
        entry.1 += 1;
    }

    let mut ranking: Vec<StoreRanking> = by_store
        .into_iter()
        .map(|(store_id, (total, count))| {
            let store_name = stores
                .iter()
                .find(|s| s.id == store_id)
                .map_or_else(|| "Desconhecido".to_string(), |s| s.name.clone());
            #[allow(clippy::cast_precision_loss)]
            let average = total / count as f64;
            StoreRanking {
                store_name,
                purchase_count: count,
                total_spent: round2(total),
                average_spent: round2(average),
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        a.average_spent
            .partial_cmp(&b.average_spent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.store_name.cmp(&b.store_name))
    });
    Ok(ranking)
}

/// Month-over-month change of the two most recent monthly totals, in
/// percent. Reports 0 with fewer than 2 months of history, and 0 when the
/// previous month's total is exactly 0 (no division is performed).
#[must_use]
pub fn personal_inflation_rate(monthly: &[MonthlyTotal]) -> f64 {
    let len = monthly.len();
    if len < 2 {
        return 0.0;
    }
    let latest = monthly[len - 1].total;
    let previous = monthly[len - 2].total;
    if previous == 0.0 {
        return 0.0;
    }
    (latest - previous) / previous * 100.0
}

/// Lifetime spend: the sum of all purchase totals.
pub async fn total_spent(db: &DatabaseConnection) -> Result<f64> {
    let purchases = Purchase::find().all(db).await?;
    Ok(round2(purchases.iter().map(|p| p.total).sum()))
}
