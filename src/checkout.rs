//! Checkout
//!
//! Builds the order payload submitted by the checkout flow. Payment confirmation and the order
//! request itself happen outside this crate; once the order is accepted the caller clears the
//! ledger.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{ledger::Ledger, pricing::PricingError, products::ProductId, storage::CartStore};

/// Errors building an order draft.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Required shipping address fields were left blank.
    #[error("missing shipping address fields: {}", .0.join(", "))]
    MissingFields(SmallVec<[&'static str; 7]>),

    /// Error pricing the cart.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Error serializing the payload.
    #[error("failed to serialize order: {0}")]
    Serialize(String),
}

/// Where the order ships to. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Street address
    pub street: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    pub country: String,
    /// Postal code
    pub zip_code: String,
}

impl ShippingAddress {
    /// Names of the fields that are blank, in form order.
    pub fn missing_fields(&self) -> SmallVec<[&'static str; 7]> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("zipCode", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Check every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing the blank fields.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_fields();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    /// Product identifier
    pub product: ProductId,
    /// Product name
    pub name: String,
    /// Units ordered
    pub quantity: u32,
    /// Image URL, empty when the product has none
    pub image: String,
    /// Unit price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Order payload for the checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Ordered products, in cart order
    pub order_items: Vec<OrderItem>,
    /// Destination
    pub shipping_address: ShippingAddress,
    /// Subtotal
    #[serde(with = "rust_decimal::serde::float")]
    pub items_price: Decimal,
    /// Tax
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_price: Decimal,
    /// Shipping
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_price: Decimal,
    /// Grand total
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl OrderDraft {
    /// Build the order payload from the current cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no items.
    /// - [`CheckoutError::MissingFields`]: the address has blank fields.
    /// - [`CheckoutError::Pricing`]: the cart could not be priced.
    pub fn from_ledger<S: CartStore>(
        ledger: &Ledger<S>,
        shipping_address: ShippingAddress,
    ) -> Result<Self, CheckoutError> {
        if ledger.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        shipping_address.validate()?;

        let totals = ledger.compute_totals()?;

        let order_items = ledger
            .iter()
            .map(|item| OrderItem {
                product: item.product_id().clone(),
                name: item.name().to_string(),
                quantity: item.quantity(),
                image: item.image().unwrap_or_default().to_string(),
                price: to_major(item.unit_price()),
            })
            .collect();

        Ok(Self {
            order_items,
            shipping_address,
            items_price: to_major(totals.subtotal()),
            tax_price: to_major(totals.tax()),
            shipping_price: to_major(totals.shipping()),
            total_price: to_major(totals.total()),
        })
    }

    /// Serialize the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CheckoutError> {
        serde_json::to_string_pretty(self).map_err(|err| CheckoutError::Serialize(err.to_string()))
    }
}

/// Amount in major units, rounded to two decimal places.
fn to_major(money: Money<'_, Currency>) -> Decimal {
    money.amount().round_dp(2)
}
