//! Items

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, multiply},
    products::{Product, ProductId},
};

/// A product entry in the cart, with the price captured when it was added.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    product_id: ProductId,
    name: String,
    image: Option<String>,
    category: Option<String>,
    list_price: Money<'a, Currency>,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Snapshot a product into a new line item.
    pub fn from_product(product: &Product<'a>, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            list_price: product.price,
            unit_price: product.effective_price(),
            quantity,
        }
    }

    /// Rebuild a line item from its stored parts.
    pub(crate) fn from_parts(
        product_id: ProductId,
        name: String,
        image: Option<String>,
        category: Option<String>,
        list_price: Money<'a, Currency>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            name,
            image,
            category,
            list_price,
            unit_price,
            quantity,
        }
    }

    /// Referenced product
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name at the time the item was added
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Product image at the time the item was added
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Product category at the time the item was added
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// List price at the time the item was added
    pub fn list_price(&self) -> Money<'a, Currency> {
        self.list_price
    }

    /// Price charged per unit
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the amount does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        multiply(self.unit_price, self.quantity)
    }

    /// Difference between list and unit price, multiplied by quantity.
    ///
    /// Negative when the captured discount price was above the list price.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or currency mismatch.
    pub fn line_savings(&self) -> Result<Money<'a, Currency>, PricingError> {
        let per_unit = self.list_price.sub(self.unit_price)?;

        multiply(per_unit, self.quantity)
    }
}
