//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// List price (e.g., "199.99 USD")
    pub price: String,

    /// Sale price, same format as `price`
    #[serde(default)]
    pub discount_price: Option<String>,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Category label
    #[serde(default)]
    pub category: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: Option<u32>,
}

impl ProductFixture {
    /// Build a product, using the fixture key as the product identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed, or if the sale price is in a different
    /// currency than the list price.
    pub fn into_product(self, key: &str) -> Result<Product<'static>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        let mut product = Product::new(key, self.name, Money::from_minor(minor_units, currency));

        if let Some(discount_price) = self.discount_price {
            let (discount_minor, discount_currency) = parse_price(&discount_price)?;

            if discount_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    discount_currency.iso_alpha_code.to_string(),
                ));
            }

            product = product.with_discount_price(Money::from_minor(discount_minor, currency));
        }

        product.image = self.image;
        product.category = self.category;
        product.stock = self.stock;

        Ok(product)
    }
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(10_i64.pow(currency.exponent), 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
