//! Ledger configuration

use rusty_money::iso::{self, Currency};

use crate::pricing::PricingPolicy;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Settings fixed for the lifetime of a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    storage_key: String,
    currency: &'static Currency,
    policy: PricingPolicy<'static>,
}

impl LedgerConfig {
    /// Configuration for `currency` with the standard pricing policy and storage key.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency,
            policy: PricingPolicy::standard(currency),
        }
    }

    /// Store the cart under a different key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Price the cart with a custom policy.
    ///
    /// The policy should be expressed in the ledger currency; totals fail to compute otherwise.
    #[must_use]
    pub fn with_policy(mut self, policy: PricingPolicy<'static>) -> Self {
        self.policy = policy;
        self
    }

    /// Key the cart record is stored under
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Currency of every amount in the ledger
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Pricing policy used for totals
    pub fn policy(&self) -> &PricingPolicy<'static> {
        &self.policy
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(iso::USD)
    }
}
