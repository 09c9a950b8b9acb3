//! Products

use std::{borrow::Borrow, fmt};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Opaque product identifier, as issued by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Product snapshot supplied by the catalog when an item is added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// List price
    pub price: Money<'a, Currency>,

    /// Discounted price, if the product is on sale
    pub discount_price: Option<Money<'a, Currency>>,

    /// Primary image URL
    pub image: Option<String>,

    /// Category label
    pub category: Option<String>,

    /// Units in stock, when the catalog reports it
    pub stock: Option<u32>,
}

impl<'a> Product<'a> {
    /// Create a product with a list price and no optional details.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            discount_price: None,
            image: None,
            category: None,
            stock: None,
        }
    }

    /// Set the discounted price.
    #[must_use]
    pub fn with_discount_price(mut self, discount_price: Money<'a, Currency>) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the stock level.
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Price charged for one unit.
    ///
    /// The discount price wins whenever it is present, even if it is higher than the list price.
    pub fn effective_price(&self) -> Money<'a, Currency> {
        self.discount_price.unwrap_or(self.price)
    }

    /// Currency the product is priced in.
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }

    /// Discount relative to the list price, rounded to whole percent points.
    ///
    /// Returns `None` when there is no discount price or the list price is zero.
    pub fn discount_percentage(&self) -> Option<Percentage> {
        let discount = self.discount_price?;
        let price_minor = self.price.to_minor_units();

        if price_minor == 0 {
            return None;
        }

        let price = Decimal::from_i64(price_minor)?;
        let saved = Decimal::from_i64(price_minor.checked_sub(discount.to_minor_units())?)?;

        let points = (saved / price * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        Some(Percentage::from(points / Decimal::ONE_HUNDRED))
    }

    /// Whether the catalog reports enough stock for `quantity` units.
    ///
    /// Unknown stock is treated as sufficient.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock.is_none_or(|stock| stock >= quantity)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    fn product() -> Product<'static> {
        Product::new("p-1", "Desk Lamp", Money::from_minor(20_000, USD))
    }

    #[test]
    fn effective_price_prefers_discount() {
        let product = product().with_discount_price(Money::from_minor(15_000, USD));

        assert_eq!(product.effective_price(), Money::from_minor(15_000, USD));
    }

    #[test]
    fn effective_price_falls_back_to_list_price() {
        assert_eq!(product().effective_price(), Money::from_minor(20_000, USD));
    }

    #[test]
    fn effective_price_keeps_discount_above_list_price() {
        let product = product().with_discount_price(Money::from_minor(25_000, USD));

        assert_eq!(product.effective_price(), Money::from_minor(25_000, USD));
    }

    #[test]
    fn discount_percentage_rounds_to_whole_points() {
        let product = product().with_discount_price(Money::from_minor(13_300, USD));

        assert_eq!(
            product.discount_percentage(),
            Some(Percentage::from(Decimal::new(34, 2)))
        );
    }

    #[test]
    fn discount_percentage_absent_without_discount() {
        assert_eq!(product().discount_percentage(), None);
    }

    #[test]
    fn discount_percentage_absent_for_free_product() {
        let product = Product::new("p-2", "Sticker", Money::from_minor(0, USD))
            .with_discount_price(Money::from_minor(0, USD));

        assert_eq!(product.discount_percentage(), None);
    }

    #[test]
    fn has_stock_for_checks_reported_stock() {
        let product = product().with_stock(2);

        assert!(product.has_stock_for(2));
        assert!(!product.has_stock_for(3));
    }

    #[test]
    fn has_stock_for_unknown_stock() {
        assert!(product().has_stock_for(1_000));
    }

    #[test]
    fn product_id_displays_inner_value() {
        let id = ProductId::from("abc123");

        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }
}
