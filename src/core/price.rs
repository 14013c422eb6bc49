//! Price intelligence - lowest-price lookups and product price history.
//!
//! Every comparison here runs over the stored **unit price**, never the
//! package price, so a 5 kg bag and a 1 kg bag of the same product compete
//! on equal terms. Matching is done in memory after a full scan: the data is
//! personal-scale and SQLite's `LIKE` is not case-insensitive for accented
//! product names ("Açúcar", "Feijão").

use crate::{
    entities::{PurchaseItem, purchase_item},
    errors::Result,
};
use sea_orm::prelude::*;
use std::cmp::Ordering;

/// Minimum product-name length before a lookup is worth firing. The entry
/// form consults this so it does not hit storage on every keystroke.
pub const MIN_LOOKUP_LEN: usize = 3;

/// Returns the historical purchase item with the lowest unit price for an
/// exactly matching product name (case-insensitive) and, when given, an
/// exactly matching brand.
///
/// Returns `Ok(None)` when nothing matches. When several items share the
/// minimum price, the most recent one wins.
pub async fn lowest_price(
    db: &DatabaseConnection,
    product_name: &str,
    brand: Option<&str>,
) -> Result<Option<purchase_item::Model>> {
    let name = product_name.trim().to_lowercase();
    if name.is_empty() {
        return Ok(None);
    }
    let brand = brand
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty());

    let items = PurchaseItem::find().all(db).await?;

    let best = items
        .into_iter()
        .filter(|item| item.product_name.to_lowercase() == name)
        .filter(|item| match &brand {
            Some(wanted) => item
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase() == *wanted),
            None => true,
        })
        .min_by(|a, b| {
            a.unit_price
                .partial_cmp(&b.unit_price)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.date.cmp(&a.date))
                .then_with(|| b.id.cmp(&a.id))
        });

    Ok(best)
}

/// Length-gated variant of [`lowest_price`] for use while the user is still
/// typing: names shorter than [`MIN_LOOKUP_LEN`] short-circuit to `Ok(None)`
/// without touching storage.
pub async fn lowest_price_hint(
    db: &DatabaseConnection,
    product_name: &str,
    brand: Option<&str>,
) -> Result<Option<purchase_item::Model>> {
    if product_name.trim().chars().count() < MIN_LOOKUP_LEN {
        return Ok(None);
    }
    lowest_price(db, product_name, brand).await
}

/// Returns every historical purchase item whose product name contains the
/// search term (case-insensitive), newest first.
pub async fn product_history(
    db: &DatabaseConnection,
    product_name: &str,
) -> Result<Vec<purchase_item::Model>> {
    let term = product_name.trim().to_lowercase();

    let mut items: Vec<purchase_item::Model> = PurchaseItem::find()
        .all(db)
        .await?
        .into_iter()
        .filter(|item| item.product_name.to_lowercase().contains(&term))
        .collect();

    items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    Ok(items)
}

/// Summary statistics over a product history slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    /// Lowest unit price ever recorded
    pub lowest: f64,
    /// Highest unit price ever recorded
    pub highest: f64,
    /// Percent change from the oldest to the most recent record; 0 with
    /// fewer than 2 records or when the oldest price is 0
    pub variation_percent: f64,
}

/// Computes [`PriceStats`] over a history returned by [`product_history`]
/// (newest first). Returns `None` for an empty history.
#[must_use]
pub fn price_stats(history: &[purchase_item::Model]) -> Option<PriceStats> {
    let first = history.first()?;

    let mut lowest = first.unit_price;
    let mut highest = first.unit_price;
    for item in history {
        lowest = lowest.min(item.unit_price);
        highest = highest.max(item.unit_price);
    }

    let variation_percent = match (history.first(), history.last()) {
        (Some(latest), Some(oldest)) if history.len() >= 2 && oldest.unit_price != 0.0 => {
            (latest.unit_price - oldest.unit_price) / oldest.unit_price * 100.0
        }
        _ => 0.0,
    };

    Some(PriceStats {
        lowest,
        highest,
        variation_percent,
    })
}
