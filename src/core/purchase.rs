//! Purchase entry and persistence.
//!
//! [`PurchaseBuilder`] accumulates line items in memory while the user is
//! at the register: items are added with a package price and normalized to a
//! per-unit price, shopping-list items are imported as pending lines, and
//! nothing touches storage until [`PurchaseBuilder::save`] writes the header
//! and all priced items in a single database transaction.
//!
//! The per-unit normalization is the one numeric contract everything else
//! depends on: history, lowest-price lookups and totals all store and
//! compare `unit_price`, never the package price.

use crate::{
    core::round2,
    entities::{Purchase, PurchaseItem, Store, purchase, purchase_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Normalizes a user-entered package price to a per-unit price.
///
/// The weight divisor is floored at 1, so blank or sub-unit weights fall
/// back to the package price itself.
#[must_use]
pub fn normalize_unit_price(package_price: f64, weight: f64) -> f64 {
    package_price / weight.max(1.0)
}

/// Pricing state of a draft line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pricing {
    /// Imported from a shopping list and awaiting a price; contributes 0 to
    /// the running total and is skipped on save
    Planned,
    /// Priced and counting toward the total
    Priced {
        /// Normalized per-unit price
        unit_price: f64,
        /// Weight or quantity the price applies to
        weight: f64,
    },
}

/// A line item being assembled for a not-yet-persisted purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    /// Temporary identifier, unique within the builder
    pub draft_id: i64,
    /// Product name as entered
    pub product_name: String,
    /// Optional brand
    pub brand: Option<String>,
    /// Category snapshot that will be written with the item
    pub category: String,
    /// Unit of measure
    pub unit: String,
    /// Whether the item is on promotion
    pub promotion: bool,
    /// Planned (pending) or priced
    pub pricing: Pricing,
    /// The shopping list this item was imported from, if any
    pub source_list_id: Option<i64>,
}

impl DraftItem {
    /// Contribution of this item to the purchase total. Pending items
    /// contribute 0.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        match self.pricing {
            Pricing::Planned => 0.0,
            Pricing::Priced { unit_price, weight } => unit_price * weight,
        }
    }

    /// Whether this item still awaits a price.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.pricing, Pricing::Planned)
    }
}

/// Form input for a new line item. The price is the package total as printed
/// on the shelf; normalization happens inside the builder.
#[derive(Debug, Clone)]
pub struct ItemInput {
    /// Product name (required)
    pub product_name: String,
    /// Optional brand
    pub brand: Option<String>,
    /// Category for the snapshot
    pub category: String,
    /// Weight or quantity; 1 when left blank
    pub weight: Option<f64>,
    /// Unit of measure
    pub unit: String,
    /// Package price as entered (required, positive)
    pub package_price: f64,
    /// Promotion flag
    pub promotion: bool,
}

/// Partial update for a draft item. Only the given fields change; a price or
/// weight change re-runs the per-unit normalization.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    /// New product name
    pub product_name: Option<String>,
    /// New brand
    pub brand: Option<String>,
    /// New category snapshot
    pub category: Option<String>,
    /// New unit of measure
    pub unit: Option<String>,
    /// New promotion flag
    pub promotion: Option<bool>,
    /// New package price; also resolves a pending item to priced
    pub package_price: Option<f64>,
    /// New weight or quantity
    pub weight: Option<f64>,
}

/// Observable state of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// No items yet
    Empty,
    /// At least one item accumulated, not yet saved
    Building,
}

/// In-memory accumulation of line items for a purchase being entered.
///
/// A successful [`save`](Self::save) persists everything and resets the
/// builder to [`BuilderState::Empty`].
#[derive(Debug, Default)]
pub struct PurchaseBuilder {
    items: Vec<DraftItem>,
    next_draft_id: i64,
    save_in_flight: bool,
}

impl PurchaseBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the builder.
    #[must_use]
    pub fn state(&self) -> BuilderState {
        if self.items.is_empty() {
            BuilderState::Empty
        } else {
            BuilderState::Building
        }
    }

    /// The accumulated draft items, in entry order.
    #[must_use]
    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    /// Running total: sum of `unit_price × weight` over priced items.
    /// Pending items contribute 0 until they are resolved.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.items.iter().map(DraftItem::line_total).sum()
    }

    /// Adds a priced line item, normalizing the entered package price to a
    /// per-unit price.
    ///
    /// # Errors
    /// Returns an error if the product name is empty, or the price or weight
    /// is not a finite positive number.
    pub fn add_item(&mut self, input: ItemInput) -> Result<&DraftItem> {
        let name = input.product_name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation {
                message: "Product name cannot be empty".to_string(),
            });
        }
        validate_amount(input.package_price)?;
        let weight = match input.weight {
            Some(w) => {
                validate_amount(w)?;
                w
            }
            None => 1.0,
        };

        let unit_price = normalize_unit_price(input.package_price, weight);
        self.next_draft_id += 1;
        let item = DraftItem {
            draft_id: self.next_draft_id,
            product_name: name,
            brand: input.brand.filter(|b| !b.trim().is_empty()),
            category: input.category,
            unit: input.unit,
            promotion: input.promotion,
            pricing: Pricing::Priced { unit_price, weight },
            source_list_id: None,
        };
        debug!(
            product = %item.product_name,
            unit_price,
            "added item to purchase draft"
        );
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Imports every item of a shopping list as a pending line item
    /// (`Pricing::Planned`). Pending lines render distinctly and must be
    /// priced via [`edit_item`](Self::edit_item) before they count toward
    /// the total. Returns the number of items imported.
    ///
    /// # Errors
    /// Returns `ListNotFound` for an unknown list.
    pub async fn import_from_list(
        &mut self,
        db: &DatabaseConnection,
        list_id: i64,
    ) -> Result<usize> {
        let list = crate::core::shopping_list::get_list_by_id(db, list_id)
            .await?
            .ok_or(Error::ListNotFound { id: list_id })?;

        let list_items = crate::core::shopping_list::get_items_for_list(db, list.id).await?;
        let imported = list_items.len();

        for entry in list_items {
            self.next_draft_id += 1;
            self.items.push(DraftItem {
                draft_id: self.next_draft_id,
                product_name: entry.product_name,
                brand: entry.brand,
                category: "Outros".to_string(),
                unit: entry.unit,
                promotion: false,
                pricing: Pricing::Planned,
                source_list_id: Some(list.id),
            });
        }

        info!(list_id, imported, "imported shopping list into purchase draft");
        Ok(imported)
    }

    /// Applies a partial update to a draft item. Changing the price or the
    /// weight re-runs the per-unit normalization; when only the weight moves
    /// the entered package price is reconstructed from the stored unit price
    /// first. Giving a pending item a price resolves it to `Priced`.
    ///
    /// # Errors
    /// Returns `ItemNotFound` for an unknown draft id, and validation errors
    /// mirroring [`add_item`](Self::add_item).
    pub fn edit_item(&mut self, draft_id: i64, patch: ItemPatch) -> Result<&DraftItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.draft_id == draft_id)
            .ok_or(Error::ItemNotFound { id: draft_id })?;

        if let Some(name) = &patch.product_name {
            if name.trim().is_empty() {
                return Err(Error::Validation {
                    message: "Product name cannot be empty".to_string(),
                });
            }
        }

        let item = &mut self.items[index];

        if patch.package_price.is_some() || patch.weight.is_some() {
            let new_weight = match patch.weight {
                Some(w) => {
                    validate_amount(w)?;
                    w
                }
                None => match item.pricing {
                    Pricing::Priced { weight, .. } => weight,
                    Pricing::Planned => 1.0,
                },
            };
            let package_price = match patch.package_price {
                Some(p) => {
                    validate_amount(p)?;
                    p
                }
                None => match item.pricing {
                    // Reconstruct what the user originally typed so the
                    // normalization contract survives weight-only edits
                    Pricing::Priced { unit_price, weight } => unit_price * weight.max(1.0),
                    Pricing::Planned => {
                        return Err(Error::Validation {
                            message: "Pending item needs a price before a weight".to_string(),
                        });
                    }
                },
            };
            item.pricing = Pricing::Priced {
                unit_price: normalize_unit_price(package_price, new_weight),
                weight: new_weight,
            };
        }

        if let Some(name) = patch.product_name {
            item.product_name = name.trim().to_string();
        }
        if let Some(brand) = patch.brand {
            item.brand = Some(brand).filter(|b| !b.trim().is_empty());
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(unit) = patch.unit {
            item.unit = unit;
        }
        if let Some(promotion) = patch.promotion {
            item.promotion = promotion;
        }

        Ok(&self.items[index])
    }

    /// Removes a draft item. Persisted data is never touched here.
    pub fn remove_item(&mut self, draft_id: i64) -> Result<()> {
        let index = self
            .items
            .iter()
            .position(|i| i.draft_id == draft_id)
            .ok_or(Error::ItemNotFound { id: draft_id })?;
        self.items.remove(index);
        Ok(())
    }

    /// Persists the draft as one purchase header plus one row per priced
    /// item, all inside a single database transaction, then resets the
    /// builder to `Empty`. Source shopping lists of imported items are
    /// consumed (deleted) in the same transaction.
    ///
    /// # Errors
    /// - `SaveInProgress` if another save on this builder has not finished
    /// - `StoreNotFound` if the store does not exist
    /// - `Validation` if no item is priced or the payment method is unknown
    /// - `Database` on any storage failure (nothing is written in that case)
    pub async fn save(
        &mut self,
        db: &DatabaseConnection,
        store_id: i64,
        date: NaiveDate,
        payment_method: &str,
    ) -> Result<purchase::Model> {
        if self.save_in_flight {
            return Err(Error::SaveInProgress);
        }
        if payment_method != purchase::PAYMENT_MEAL_ALLOWANCE
            && payment_method != purchase::PAYMENT_PERSONAL
        {
            return Err(Error::Validation {
                message: format!("Unknown payment method: {payment_method}"),
            });
        }
        if !self.items.iter().any(|i| !i.is_pending()) {
            return Err(Error::Validation {
                message: "Purchase needs at least one priced item".to_string(),
            });
        }

        self.save_in_flight = true;
        let result = self.persist(db, store_id, date, payment_method).await;
        self.save_in_flight = false;

        let saved = result?;
        self.items.clear();
        info!(
            purchase_id = saved.id,
            total = saved.total,
            "purchase saved"
        );
        Ok(saved)
    }

    async fn persist(
        &self,
        db: &DatabaseConnection,
        store_id: i64,
        date: NaiveDate,
        payment_method: &str,
    ) -> Result<purchase::Model> {
        let txn = db.begin().await?;

        let rows: Vec<NewItem> = self
            .items
            .iter()
            .filter_map(|item| match item.pricing {
                Pricing::Planned => None,
                Pricing::Priced { unit_price, weight } => Some(NewItem {
                    product_name: item.product_name.clone(),
                    brand: item.brand.clone(),
                    category: item.category.clone(),
                    weight,
                    unit: item.unit.clone(),
                    unit_price,
                    promotion: item.promotion,
                }),
            })
            .collect();

        let saved =
            insert_purchase_with_items(&txn, store_id, date, payment_method, &rows).await?;

        // Importing a list couples its lifetime to this purchase: a saved
        // purchase consumes the source list entirely
        let mut list_ids: Vec<i64> = self.items.iter().filter_map(|i| i.source_list_id).collect();
        list_ids.sort_unstable();
        list_ids.dedup();
        for list_id in list_ids {
            crate::core::shopping_list::delete_list_cascade(&txn, list_id).await?;
        }

        txn.commit().await?;
        Ok(saved)
    }
}

/// A priced line ready to be written as part of a purchase. Shared between
/// the builder save and the live-cart checkout.
#[derive(Debug, Clone)]
pub(crate) struct NewItem {
    pub product_name: String,
    pub brand: Option<String>,
    pub category: String,
    pub weight: f64,
    pub unit: String,
    pub unit_price: f64,
    pub promotion: bool,
}

/// Writes one purchase header and its line items on the given connection
/// (normally an open transaction). The header total is the 2-decimal-rounded
/// sum of `unit_price × weight`; each item's date is copied from the header.
pub(crate) async fn insert_purchase_with_items<C>(
    db: &C,
    store_id: i64,
    date: NaiveDate,
    payment_method: &str,
    items: &[NewItem],
) -> Result<purchase::Model>
where
    C: ConnectionTrait,
{
    let store = Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(Error::StoreNotFound { id: store_id })?;

    let total = round2(items.iter().map(|i| i.unit_price * i.weight).sum());

    let header = purchase::ActiveModel {
        date: Set(date),
        store_id: Set(store.id),
        total: Set(total),
        payment_method: Set(Some(payment_method.to_string())),
        ..Default::default()
    };
    let header = header.insert(db).await?;

    for item in items {
        let row = purchase_item::ActiveModel {
            purchase_id: Set(header.id),
            product_name: Set(item.product_name.clone()),
            brand: Set(item.brand.clone()),
            category: Set(item.category.clone()),
            weight: Set(item.weight),
            unit: Set(item.unit.clone()),
            unit_price: Set(item.unit_price),
            promotion: Set(item.promotion),
            date: Set(date),
            ..Default::default()
        };
        row.insert(db).await?;
    }

    Ok(header)
}

/// Retrieves all purchases, newest first.
pub async fn get_all_purchases(db: &DatabaseConnection) -> Result<Vec<purchase::Model>> {
    Purchase::find()
        .order_by_desc(purchase::Column::Date)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific purchase by its unique ID.
pub async fn get_purchase_by_id(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Option<purchase::Model>> {
    Purchase::find_by_id(purchase_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the line items of a purchase.
pub async fn get_items_for_purchase(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Vec<purchase_item::Model>> {
    PurchaseItem::find()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every line item across all purchases.
pub async fn get_all_purchase_items(db: &DatabaseConnection) -> Result<Vec<purchase_item::Model>> {
    PurchaseItem::find().all(db).await.map_err(Into::into)
}

/// Re-prices a persisted line item from a new package price and weight,
/// reapplying the per-unit normalization, and rewrites the parent purchase
/// total in the same transaction.
pub async fn update_purchase_item(
    db: &DatabaseConnection,
    item_id: i64,
    package_price: f64,
    weight: f64,
) -> Result<purchase_item::Model> {
    validate_amount(package_price)?;
    validate_amount(weight)?;

    let txn = db.begin().await?;

    let item = PurchaseItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;
    let purchase_id = item.purchase_id;

    let mut active: purchase_item::ActiveModel = item.into();
    active.unit_price = Set(normalize_unit_price(package_price, weight));
    active.weight = Set(weight);
    let updated = active.update(&txn).await?;

    recompute_purchase_total(&txn, purchase_id).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Deletes a persisted line item and rewrites the parent purchase total.
/// Removing the last item leaves the purchase in place with total 0.
pub async fn delete_purchase_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let item = PurchaseItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;
    let purchase_id = item.purchase_id;

    item.delete(&txn).await?;
    recompute_purchase_total(&txn, purchase_id).await?;

    txn.commit().await?;
    Ok(())
}

/// Deletes a purchase together with all of its line items.
pub async fn delete_purchase(db: &DatabaseConnection, purchase_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let header = Purchase::find_by_id(purchase_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseNotFound { id: purchase_id })?;

    PurchaseItem::delete_many()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .exec(&txn)
        .await?;
    header.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Recomputes a purchase total from its current line items and writes it
/// back. Keeps the `total == Σ unit_price × weight` invariant after every
/// item mutation.
async fn recompute_purchase_total<C>(db: &C, purchase_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let header = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::PurchaseNotFound { id: purchase_id })?;

    let items = PurchaseItem::find()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .all(db)
        .await?;
    let total = round2(items.iter().map(|i| i.unit_price * i.weight).sum());

    let mut active: purchase::ActiveModel = header.into();
    active.total = Set(total);
    active.update(db).await?;

    Ok(total)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::shopping_list;
    use crate::entities::{ShoppingList, ShoppingListItem};
    use crate::test_utils::{priced_input, setup_test_db, setup_with_store};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_add_item_requires_name_and_price() {
        let mut builder = PurchaseBuilder::new();

        let result = builder.add_item(priced_input("  ", 5.0, None));
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = builder.add_item(priced_input("Arroz", 0.0, None));
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        let result = builder.add_item(priced_input("Arroz", f64::NAN, None));
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        let result = builder.add_item(priced_input("Arroz", 5.0, Some(-1.0)));
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        assert_eq!(builder.state(), BuilderState::Empty);
    }

    #[test]
    fn test_add_item_normalizes_package_price() {
        let mut builder = PurchaseBuilder::new();

        // 5 kg bag for R$ 25.00 -> R$ 5.00 per kg
        let item = builder.add_item(priced_input("Arroz", 25.0, Some(5.0))).unwrap();
        assert_eq!(
            item.pricing,
            Pricing::Priced {
                unit_price: 5.0,
                weight: 5.0
            }
        );

        // Blank weight defaults to 1
        let item = builder.add_item(priced_input("Feijão", 8.0, None)).unwrap();
        assert_eq!(
            item.pricing,
            Pricing::Priced {
                unit_price: 8.0,
                weight: 1.0
            }
        );

        // Sub-unit weights never inflate the unit price
        let item = builder.add_item(priced_input("Queijo", 20.0, Some(0.5))).unwrap();
        assert_eq!(
            item.pricing,
            Pricing::Priced {
                unit_price: 20.0,
                weight: 0.5
            }
        );
    }

    #[test]
    fn test_running_total() {
        let mut builder = PurchaseBuilder::new();
        assert_eq!(builder.state(), BuilderState::Empty);

        builder.add_item(priced_input("Arroz", 25.0, Some(5.0))).unwrap();
        builder.add_item(priced_input("Feijão", 8.0, None)).unwrap();

        assert_eq!(builder.state(), BuilderState::Building);
        // (5.00 × 5) + (8.00 × 1)
        assert_eq!(builder.total(), 33.0);
    }

    #[test]
    fn test_edit_item_renormalizes() {
        let mut builder = PurchaseBuilder::new();
        let id = builder
            .add_item(priced_input("Arroz", 25.0, Some(5.0)))
            .unwrap()
            .draft_id;

        // Weight-only edit: the entered package price (25.00) is kept
        let item = builder
            .edit_item(
                id,
                ItemPatch {
                    weight: Some(2.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            item.pricing,
            Pricing::Priced {
                unit_price: 12.5,
                weight: 2.0
            }
        );

        // Price edit recomputes against the current weight
        let item = builder
            .edit_item(
                id,
                ItemPatch {
                    package_price: Some(30.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            item.pricing,
            Pricing::Priced {
                unit_price: 15.0,
                weight: 2.0
            }
        );
    }

    #[test]
    fn test_remove_item() {
        let mut builder = PurchaseBuilder::new();
        let id = builder
            .add_item(priced_input("Arroz", 10.0, None))
            .unwrap()
            .draft_id;

        builder.remove_item(id).unwrap();
        assert_eq!(builder.state(), BuilderState::Empty);

        let missing = builder.remove_item(id);
        assert!(matches!(missing.unwrap_err(), Error::ItemNotFound { id: _ }));
    }

    #[tokio::test]
    async fn test_save_requires_existing_store() -> Result<()> {
        let db = setup_test_db().await?;
        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 10.0, None))?;

        let result = builder.save(&db, 999, date("2025-07-01"), "va").await;
        assert!(matches!(result.unwrap_err(), Error::StoreNotFound { id: 999 }));

        // Nothing was written and the draft survives a failed save
        assert!(get_all_purchases(&db).await?.is_empty());
        assert_eq!(builder.state(), BuilderState::Building);

        Ok(())
    }

    #[tokio::test]
    async fn test_save_requires_priced_items() -> Result<()> {
        let (db, store) = setup_with_store().await?;
        let mut builder = PurchaseBuilder::new();

        let result = builder.save(&db, store.id, date("2025-07-01"), "va").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_payment_method() -> Result<()> {
        let (db, store) = setup_with_store().await?;
        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 10.0, None))?;

        let result = builder
            .save(&db, store.id, date("2025-07-01"), "cheque")
            .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_persists_header_and_items() -> Result<()> {
        let (db, store) = setup_with_store().await?;
        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 25.0, Some(5.0)))?;
        builder.add_item(priced_input("Feijão", 8.0, None))?;

        let saved = builder
            .save(&db, store.id, date("2025-07-01"), "personal")
            .await?;

        assert_eq!(saved.total, 33.0);
        assert_eq!(saved.store_id, store.id);
        assert_eq!(saved.payment_method.as_deref(), Some("personal"));
        assert_eq!(builder.state(), BuilderState::Empty);

        let items = get_items_for_purchase(&db, saved.id).await?;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price, 5.0);
        assert_eq!(items[0].weight, 5.0);
        // Item dates are copied from the purchase
        assert!(items.iter().all(|i| i.date == date("2025-07-01")));

        Ok(())
    }

    #[tokio::test]
    async fn test_import_resolve_save_consumes_list() -> Result<()> {
        let (db, store) = setup_with_store().await?;

        let list = shopping_list::create_list(&db, "Semana".to_string()).await?;
        shopping_list::add_list_item(&db, list.id, "Leite".to_string(), "un".to_string()).await?;

        let mut builder = PurchaseBuilder::new();
        let imported = builder.import_from_list(&db, list.id).await?;
        assert_eq!(imported, 1);

        // Pending: excluded from the total, save refuses
        let pending = &builder.items()[0];
        assert!(pending.is_pending());
        assert_eq!(builder.total(), 0.0);
        let refused = builder.save(&db, store.id, date("2025-07-02"), "va").await;
        assert!(matches!(refused.unwrap_err(), Error::Validation { message: _ }));

        // Resolving the price brings it into the total
        let pending_id = builder.items()[0].draft_id;
        builder.edit_item(
            pending_id,
            ItemPatch {
                package_price: Some(4.5),
                ..Default::default()
            },
        )?;
        assert_eq!(builder.total(), 4.5);

        let saved = builder.save(&db, store.id, date("2025-07-02"), "va").await?;
        assert_eq!(saved.total, 4.5);

        // The source list and its items were consumed by the save
        assert!(ShoppingList::find().all(&db).await?.is_empty());
        assert!(ShoppingListItem::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_import_unknown_list() -> Result<()> {
        let db = setup_test_db().await?;
        let mut builder = PurchaseBuilder::new();

        let result = builder.import_from_list(&db, 42).await;
        assert!(matches!(result.unwrap_err(), Error::ListNotFound { id: 42 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_item_recomputes_total() -> Result<()> {
        let (db, store) = setup_with_store().await?;
        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 25.0, Some(5.0)))?;
        builder.add_item(priced_input("Feijão", 8.0, None))?;
        let saved = builder.save(&db, store.id, date("2025-07-01"), "va").await?;

        let items = get_items_for_purchase(&db, saved.id).await?;
        delete_purchase_item(&db, items[0].id).await?;

        let updated = get_purchase_by_id(&db, saved.id).await?.unwrap();
        assert_eq!(updated.total, 8.0);

        // Removing the last item leaves the purchase with total 0
        delete_purchase_item(&db, items[1].id).await?;
        let emptied = get_purchase_by_id(&db, saved.id).await?.unwrap();
        assert_eq!(emptied.total, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_renormalizes_and_recomputes() -> Result<()> {
        let (db, store) = setup_with_store().await?;
        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 25.0, Some(5.0)))?;
        let saved = builder.save(&db, store.id, date("2025-07-01"), "va").await?;

        let items = get_items_for_purchase(&db, saved.id).await?;
        let updated = update_purchase_item(&db, items[0].id, 30.0, 2.0).await?;
        assert_eq!(updated.unit_price, 15.0);
        assert_eq!(updated.weight, 2.0);

        let header = get_purchase_by_id(&db, saved.id).await?.unwrap();
        assert_eq!(header.total, 30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_purchase_cascades() -> Result<()> {
        let (db, store) = setup_with_store().await?;
        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 10.0, None))?;
        let saved = builder.save(&db, store.id, date("2025-07-01"), "va").await?;

        delete_purchase(&db, saved.id).await?;

        assert!(get_purchase_by_id(&db, saved.id).await?.is_none());
        assert!(get_all_purchase_items(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_purchases_newest_first() -> Result<()> {
        let (db, store) = setup_with_store().await?;

        let mut builder = PurchaseBuilder::new();
        builder.add_item(priced_input("Arroz", 10.0, None))?;
        builder.save(&db, store.id, date("2025-05-01"), "va").await?;
        builder.add_item(priced_input("Feijão", 8.0, None))?;
        builder.save(&db, store.id, date("2025-07-01"), "va").await?;

        let purchases = get_all_purchases(&db).await?;
        assert_eq!(purchases.len(), 2);
        assert!(purchases[0].date > purchases[1].date);

        Ok(())
    }
}
