//! Pricing
//!
//! Storefront pricing policy: a flat tax rate, and flat-rate shipping that is waived once the
//! subtotal goes over a threshold.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Flat tax rate applied to the subtotal, as a fraction (0.10).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Shipping is free when the subtotal is strictly above this many major units.
pub const SHIPPING_THRESHOLD: i64 = 1000;

/// Flat shipping charge in major units.
pub const SHIPPING_COST: i64 = 50;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount did not fit in `i64` minor units.
    #[error("amount overflowed minor units")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Tax and shipping rules for a single currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy<'a> {
    tax_rate: Percentage,
    free_shipping_threshold: Money<'a, Currency>,
    shipping_cost: Money<'a, Currency>,
}

impl<'a> PricingPolicy<'a> {
    /// Create a policy from its parts.
    pub fn new(
        tax_rate: Percentage,
        free_shipping_threshold: Money<'a, Currency>,
        shipping_cost: Money<'a, Currency>,
    ) -> Self {
        Self {
            tax_rate,
            free_shipping_threshold,
            shipping_cost,
        }
    }

    /// The storefront policy: 10% tax, free shipping over 1000, otherwise 50.
    pub fn standard(currency: &'a Currency) -> Self {
        Self::new(
            Percentage::from(TAX_RATE),
            Money::from_major(SHIPPING_THRESHOLD, currency),
            Money::from_major(SHIPPING_COST, currency),
        )
    }

    /// Tax rate as a fraction.
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Subtotal that must be exceeded for free shipping.
    pub fn free_shipping_threshold(&self) -> Money<'a, Currency> {
        self.free_shipping_threshold
    }

    /// Shipping charge below the threshold.
    pub fn shipping_cost(&self) -> Money<'a, Currency> {
        self.shipping_cost
    }

    /// Currency the policy amounts are expressed in.
    pub fn currency(&self) -> &'a Currency {
        self.shipping_cost.currency()
    }

    /// Price a list of line items.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: an amount did not fit in minor units.
    /// - [`PricingError::Money`]: an item is priced in a different currency than the policy.
    pub fn price(&self, items: &[LineItem<'a>]) -> Result<PricingSnapshot<'a>, PricingError> {
        let currency = self.currency();

        let subtotal = items.iter().try_fold(
            Money::from_minor(0, currency),
            |acc: Money<'a, Currency>, item| -> Result<_, PricingError> {
                Ok(acc.add(item.line_total()?)?)
            },
        )?;

        self.snapshot(subtotal)
    }

    /// Derive tax, shipping and total from a subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on overflow or currency mismatch.
    pub fn snapshot(
        &self,
        subtotal: Money<'a, Currency>,
    ) -> Result<PricingSnapshot<'a>, PricingError> {
        let tax = Money::from_minor(
            percent_of_minor(&self.tax_rate, subtotal.to_minor_units())?,
            subtotal.currency(),
        );

        let shipping = if self.ships_free(subtotal) {
            Money::from_minor(0, subtotal.currency())
        } else {
            self.shipping_cost
        };

        let total = subtotal.add(tax)?.add(shipping)?;

        Ok(PricingSnapshot {
            subtotal,
            tax,
            shipping,
            total,
            free_shipping_threshold: self.free_shipping_threshold,
        })
    }

    fn ships_free(&self, subtotal: Money<'a, Currency>) -> bool {
        subtotal.to_minor_units() > self.free_shipping_threshold.to_minor_units()
    }
}

/// Derived monetary figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingSnapshot<'a> {
    subtotal: Money<'a, Currency>,
    tax: Money<'a, Currency>,
    shipping: Money<'a, Currency>,
    total: Money<'a, Currency>,
    free_shipping_threshold: Money<'a, Currency>,
}

impl<'a> PricingSnapshot<'a> {
    /// Sum of line totals
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Tax on the subtotal
    pub fn tax(&self) -> Money<'a, Currency> {
        self.tax
    }

    /// Shipping charge, zero when free
    pub fn shipping(&self) -> Money<'a, Currency> {
        self.shipping
    }

    /// Subtotal plus tax plus shipping
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Whether shipping was waived.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }

    /// How much more must be spent before shipping would be waived.
    ///
    /// `None` once the subtotal has reached the threshold. At exactly the threshold shipping is
    /// still charged; the subtotal has to go over it.
    pub fn amount_until_free_shipping(&self) -> Option<Money<'a, Currency>> {
        let remaining = self
            .free_shipping_threshold
            .to_minor_units()
            .checked_sub(self.subtotal.to_minor_units())?;

        (remaining > 0).then(|| Money::from_minor(remaining, self.subtotal.currency()))
    }
}

/// Multiply a price by a quantity in minor units.
pub(crate) fn multiply<'a>(
    price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Apply a percentage to a minor unit amount, rounding half away from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    ((*percent) * Decimal::ONE) // the inner Decimal is only reachable through arithmetic
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}
