//! Persisted cart records

use std::num::NonZeroU32;

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{items::LineItem, products::ProductId};

/// Reasons a stored cart record is rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record is not valid JSON or has the wrong shape.
    #[error("malformed cart record: {0}")]
    Json(#[from] serde_json::Error),

    /// The same product appears more than once.
    #[error("duplicate product in cart record: {0}")]
    DuplicateProduct(ProductId),

    /// An item is priced in a currency other than the ledger currency.
    #[error("product {product} has currency {found}, but the cart uses {expected}")]
    CurrencyMismatch {
        /// Offending product
        product: ProductId,
        /// Currency code found in the record
        found: String,
        /// Ledger currency code
        expected: &'static str,
    },
}

/// One line item as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRecord {
    /// Referenced product
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Product image
    pub image: Option<String>,

    /// Product category
    pub category: Option<String>,

    /// ISO alpha code of the prices
    pub currency: String,

    /// List price in minor units
    pub list_price: i64,

    /// Charged unit price in minor units
    pub unit_price: i64,

    /// Number of units, never zero
    pub quantity: NonZeroU32,
}

impl From<&LineItem<'_>> for LineItemRecord {
    fn from(item: &LineItem<'_>) -> Self {
        Self {
            product_id: item.product_id().clone(),
            name: item.name().to_string(),
            image: item.image().map(str::to_string),
            category: item.category().map(str::to_string),
            currency: item.unit_price().currency().iso_alpha_code.to_string(),
            list_price: item.list_price().to_minor_units(),
            unit_price: item.unit_price().to_minor_units(),
            quantity: NonZeroU32::new(item.quantity()).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl LineItemRecord {
    fn into_line_item(
        self,
        currency: &'static Currency,
    ) -> Result<LineItem<'static>, RecordError> {
        if self.currency != currency.iso_alpha_code {
            return Err(RecordError::CurrencyMismatch {
                product: self.product_id,
                found: self.currency,
                expected: currency.iso_alpha_code,
            });
        }

        Ok(LineItem::from_parts(
            self.product_id,
            self.name,
            self.image,
            self.category,
            Money::from_minor(self.list_price, currency),
            Money::from_minor(self.unit_price, currency),
            self.quantity.get(),
        ))
    }
}

/// Serialize line items into the stored record.
///
/// # Errors
///
/// Returns [`RecordError::Json`] if serialization fails.
pub fn encode(items: &[LineItem<'_>]) -> Result<String, RecordError> {
    let records: Vec<LineItemRecord> = items.iter().map(LineItemRecord::from).collect();

    Ok(serde_json::to_string(&records)?)
}

/// Parse a stored record back into line items priced in `currency`.
///
/// # Errors
///
/// Returns a [`RecordError`] if the record is malformed, repeats a product, or is priced in
/// another currency. Prices are taken as stored, negative ones included.
pub fn decode(
    contents: &str,
    currency: &'static Currency,
) -> Result<Vec<LineItem<'static>>, RecordError> {
    let records: Vec<LineItemRecord> = serde_json::from_str(contents)?;
    let mut seen = FxHashSet::default();

    records
        .into_iter()
        .map(|record| {
            if !seen.insert(record.product_id.clone()) {
                return Err(RecordError::DuplicateProduct(record.product_id));
            }

            record.into_line_item(currency)
        })
        .collect()
}
