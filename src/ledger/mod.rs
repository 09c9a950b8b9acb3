//! Cart ledger
//!
//! The cart as an ordered, de-duplicated list of [`LineItem`]s that is written back to a
//! [`CartStore`] after every change. Persistence problems never reach the caller: a bad record
//! is discarded on load, and a failed write is logged while the in-memory cart carries on.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    config::LedgerConfig,
    items::LineItem,
    pricing::{PricingError, PricingSnapshot},
    products::{Product, ProductId},
    storage::CartStore,
};

pub mod records;

pub use records::{LineItemRecord, RecordError};

/// Errors returned by ledger mutations.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// A product is priced in a different currency than the cart.
    ///
    /// Carries the product, the product currency and the cart currency.
    #[error("product {0} has currency {1}, but the cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// What [`Ledger::add_item`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended.
    Inserted,

    /// The product was already in the cart; its quantity was increased.
    Merged,

    /// Nothing was added because the quantity was zero.
    Ignored,
}

/// A persistent shopping cart.
#[derive(Debug)]
pub struct Ledger<S: CartStore> {
    items: Vec<LineItem<'static>>,
    store: S,
    config: LedgerConfig,
}

impl<S: CartStore> Ledger<S> {
    /// Create an empty ledger without reading the store.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            items: Vec::new(),
            store,
            config,
        }
    }

    /// Create a ledger from whatever the store holds.
    ///
    /// An unreadable or malformed record yields an empty ledger and the record is removed.
    pub fn load(store: S, config: LedgerConfig) -> Self {
        let mut ledger = Self::new(store, config);
        ledger.reload();
        ledger
    }

    /// Replace the in-memory cart with the stored record.
    ///
    /// An unreadable or malformed record yields an empty ledger and the record is removed.
    pub fn reload(&mut self) {
        let items = match self.store.read(self.config.storage_key()) {
            Ok(None) => Vec::new(),
            Ok(Some(contents)) => match records::decode(&contents, self.config.currency()) {
                Ok(items) => items,
                Err(err) => {
                    warn!(
                        key = self.config.storage_key(),
                        error = %err,
                        "discarding malformed cart record"
                    );
                    self.discard_record();
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(
                    key = self.config.storage_key(),
                    error = %err,
                    "failed to read cart record"
                );
                self.discard_record();
                Vec::new()
            }
        };

        self.items = items;

        info!(
            key = self.config.storage_key(),
            items = self.items.len(),
            "cart loaded"
        );
    }

    /// Add `quantity` units of a product.
    ///
    /// A product already in the cart has its quantity increased; otherwise a new line item is
    /// appended with the product's effective price. A zero quantity changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn add_item(
        &mut self,
        product: &Product<'_>,
        quantity: u32,
    ) -> Result<AddOutcome, LedgerError> {
        let currency = self.config.currency();

        if product.currency() != currency {
            return Err(LedgerError::CurrencyMismatch(
                product.id.clone(),
                product.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        if quantity == 0 {
            debug!(product = %product.id, "ignoring add with zero quantity");
            return Ok(AddOutcome::Ignored);
        }

        let outcome = if let Some(item) = self.find_mut(&product.id) {
            item.set_quantity(item.quantity().saturating_add(quantity));
            AddOutcome::Merged
        } else {
            self.items.push(snapshot(product, currency, quantity));
            AddOutcome::Inserted
        };

        debug!(product = %product.id, quantity, ?outcome, "added to cart");

        self.persist();

        Ok(outcome)
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn add_one(&mut self, product: &Product<'_>) -> Result<AddOutcome, LedgerError> {
        self.add_item(product, 1)
    }

    /// Remove a product from the cart, returning its line item if it was present.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<LineItem<'static>> {
        let removed = self
            .position(product_id)
            .map(|idx| self.items.remove(idx));

        debug!(product = %product_id, removed = removed.is_some(), "removed from cart");

        self.persist();

        removed
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero removes the product. Products not in the cart are left alone.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(item) = self.find_mut(product_id) {
            item.set_quantity(quantity);
            debug!(product = %product_id, quantity, "quantity updated");
        }

        self.persist();
    }

    /// Add one unit of a product already in the cart.
    pub fn increment(&mut self, product_id: &ProductId) {
        if let Some(quantity) = self.get(product_id).map(LineItem::quantity) {
            self.set_quantity(product_id, quantity.saturating_add(1));
        }
    }

    /// Take one unit of a product out of the cart, removing it after the last unit.
    pub fn decrement(&mut self, product_id: &ProductId) {
        if let Some(quantity) = self.get(product_id).map(LineItem::quantity) {
            self.set_quantity(product_id, quantity.saturating_sub(1));
        }
    }

    /// Empty the cart and erase the stored record.
    pub fn clear(&mut self) {
        self.items.clear();

        let key = self.config.storage_key();

        if let Err(err) = self.store.remove(key) {
            error!(key, error = %err, "failed to remove cart record");
        }

        info!(key, "cart cleared");
    }

    /// Total number of units across all line items.
    pub fn total_item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Whether the product is in the cart.
    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Quantity of a product in the cart, or zero.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.get(product_id).map_or(0, LineItem::quantity)
    }

    /// Line item for a product.
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem<'static>> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Line items in the order they were added.
    pub fn items(&self) -> &[LineItem<'static>] {
        &self.items
    }

    /// Iterate over the line items in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'static>> {
        self.items.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of every amount in the cart.
    pub fn currency(&self) -> &'static Currency {
        self.config.currency()
    }

    /// Ledger configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Borrow the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subtotal, tax, shipping and total under the configured pricing policy.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an amount overflows or the policy currency differs from the
    /// cart currency.
    pub fn compute_totals(&self) -> Result<PricingSnapshot<'static>, PricingError> {
        self.config.policy().price(&self.items)
    }

    /// Total saved against list prices.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if an amount overflows.
    pub fn savings(&self) -> Result<Money<'static, Currency>, PricingError> {
        self.items.iter().try_fold(
            Money::from_minor(0, self.currency()),
            |acc, item| -> Result<_, PricingError> { Ok(acc.add(item.line_savings()?)?) },
        )
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem<'static>> {
        self.items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
    }

    fn persist(&mut self) {
        let key = self.config.storage_key();

        let contents = match records::encode(&self.items) {
            Ok(contents) => contents,
            Err(err) => {
                error!(key, error = %err, "failed to encode cart");
                return;
            }
        };

        if let Err(err) = self.store.write(key, &contents) {
            error!(key, error = %err, "failed to persist cart");
        }
    }

    fn discard_record(&mut self) {
        let key = self.config.storage_key();

        if let Err(err) = self.store.remove(key) {
            error!(key, error = %err, "failed to remove malformed cart record");
        }
    }
}

/// Capture a product as a line item priced in the ledger currency.
fn snapshot(
    product: &Product<'_>,
    currency: &'static Currency,
    quantity: u32,
) -> LineItem<'static> {
    LineItem::from_parts(
        product.id.clone(),
        product.name.clone(),
        product.image.clone(),
        product.category.clone(),
        Money::from_minor(product.price.to_minor_units(), currency),
        Money::from_minor(product.effective_price().to_minor_units(), currency),
        quantity,
    )
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use testresult::TestResult;

    use crate::storage::{MemoryStore, StoreError};

    use super::*;

    /// A store whose writes always fail.
    #[derive(Debug, Default)]
    struct BrokenStore {
        removes: usize,
    }

    impl CartStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("read disabled".to_string()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            self.removes += 1;
            Err(StoreError::Unavailable("remove disabled".to_string()))
        }
    }

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::load(MemoryStore::new(), LedgerConfig::default())
    }

    fn product(id: &str, major: i64) -> Product<'static> {
        Product::new(id, format!("Product {id}"), Money::from_major(major, USD))
    }

    #[test]
    fn load_from_empty_store_is_empty() {
        let ledger = ledger();

        assert!(ledger.is_empty());
        assert_eq!(ledger.total_item_count(), 0);
    }

    #[test]
    fn add_distinct_products_sums_quantities() -> TestResult {
        let mut ledger = ledger();

        ledger.add_item(&product("a", 10), 2)?;
        ledger.add_item(&product("b", 20), 3)?;
        ledger.add_one(&product("c", 30))?;

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total_item_count(), 6);

        Ok(())
    }

    #[test]
    fn add_same_product_merges_quantity() -> TestResult {
        let mut ledger = ledger();

        assert_eq!(ledger.add_item(&product("a", 10), 2)?, AddOutcome::Inserted);
        assert_eq!(ledger.add_item(&product("a", 10), 5)?, AddOutcome::Merged);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.quantity_of(&"a".into()), 7);

        Ok(())
    }

    #[test]
    fn add_keeps_insertion_order() -> TestResult {
        let mut ledger = ledger();

        ledger.add_one(&product("b", 10))?;
        ledger.add_one(&product("a", 10))?;
        ledger.add_one(&product("b", 10))?;

        let ids: Vec<&str> = ledger.iter().map(|item| item.product_id().as_str()).collect();

        assert_eq!(ids, ["b", "a"]);

        Ok(())
    }

    #[test]
    fn add_captures_price_at_add_time() -> TestResult {
        let mut ledger = ledger();
        let mut lamp = product("lamp", 200).with_discount_price(Money::from_major(150, USD));

        ledger.add_one(&lamp)?;

        lamp.discount_price = None;
        ledger.add_one(&lamp)?;

        let item = ledger.get(&"lamp".into()).ok_or("expected lamp")?;

        assert_eq!(item.unit_price(), Money::from_major(150, USD));
        assert_eq!(item.quantity(), 2);

        Ok(())
    }

    #[test]
    fn add_zero_quantity_is_ignored() -> TestResult {
        let mut ledger = ledger();

        assert_eq!(ledger.add_item(&product("a", 10), 0)?, AddOutcome::Ignored);
        assert!(!ledger.contains_product(&"a".into()));

        Ok(())
    }

    #[test]
    fn add_rejects_other_currency() {
        let mut ledger = ledger();
        let euro = Product::new("eur", "Euro", Money::from_major(10, EUR));

        assert_eq!(
            ledger.add_one(&euro),
            Err(LedgerError::CurrencyMismatch(
                "eur".into(),
                EUR.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_missing_product_is_noop() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(&product("a", 10), 2)?;

        let before = ledger.items().to_vec();

        assert_eq!(ledger.remove_item(&"missing".into()), None);
        assert_eq!(ledger.items(), before.as_slice());

        Ok(())
    }

    #[test]
    fn remove_returns_line_item() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(&product("a", 10), 2)?;

        let removed = ledger.remove_item(&"a".into()).ok_or("expected removal")?;

        assert_eq!(removed.quantity(), 2);
        assert!(ledger.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_zero_matches_remove() -> TestResult {
        let mut via_set = ledger();
        let mut via_remove = ledger();

        for ledger in [&mut via_set, &mut via_remove] {
            ledger.add_item(&product("a", 10), 2)?;
            ledger.add_item(&product("b", 20), 1)?;
        }

        via_set.set_quantity(&"a".into(), 0);
        via_remove.remove_item(&"a".into());

        assert_eq!(via_set.items(), via_remove.items());
        assert_eq!(via_set.store().get("cart"), via_remove.store().get("cart"));

        Ok(())
    }

    #[test]
    fn set_quantity_updates_present_product() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(&product("a", 10), 2)?;

        ledger.set_quantity(&"a".into(), 9);
        ledger.set_quantity(&"missing".into(), 4);

        assert_eq!(ledger.quantity_of(&"a".into()), 9);
        assert_eq!(ledger.quantity_of(&"missing".into()), 0);
        assert_eq!(ledger.len(), 1);

        Ok(())
    }

    #[test]
    fn increment_and_decrement() -> TestResult {
        let mut ledger = ledger();
        ledger.add_one(&product("a", 10))?;

        ledger.increment(&"a".into());
        assert_eq!(ledger.quantity_of(&"a".into()), 2);

        ledger.decrement(&"a".into());
        ledger.decrement(&"a".into());
        assert!(!ledger.contains_product(&"a".into()));

        ledger.increment(&"a".into());
        assert!(ledger.is_empty());

        Ok(())
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let mut ledger = ledger();

        ledger.add_item(&product("a", 10), 2)?;
        let stored = records::decode(ledger.store().get("cart").ok_or("record")?, USD)?;
        assert_eq!(stored.len(), 1);

        ledger.set_quantity(&"a".into(), 5);
        let stored = records::decode(ledger.store().get("cart").ok_or("record")?, USD)?;
        assert_eq!(stored.first().map(LineItem::quantity), Some(5));

        ledger.remove_item(&"a".into());
        assert_eq!(ledger.store().get("cart"), Some("[]"));

        Ok(())
    }

    #[test]
    fn clear_empties_and_removes_record() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(&product("a", 10), 2)?;

        ledger.clear();

        assert!(ledger.is_empty());
        assert!(!ledger.store().contains("cart"));

        Ok(())
    }

    #[test]
    fn load_restores_previous_session() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(&product("a", 10), 2)?;
        ledger.add_item(
            &product("b", 300).with_discount_price(Money::from_major(250, USD)),
            1,
        )?;

        let totals = ledger.compute_totals()?;
        let items = ledger.items().to_vec();

        let restored = Ledger::load(ledger.store().clone(), LedgerConfig::default());

        assert_eq!(restored.items(), items.as_slice());
        assert_eq!(restored.compute_totals()?, totals);

        Ok(())
    }

    #[test]
    fn load_restores_negative_prices() -> TestResult {
        let mut ledger = ledger();
        ledger.add_one(&product("good", 10))?;
        ledger.add_one(&Product::new(
            "credit",
            "Store Credit",
            Money::from_major(-5, USD),
        ))?;

        let items = ledger.items().to_vec();

        let restored = Ledger::load(ledger.store().clone(), LedgerConfig::default());

        assert_eq!(restored.items(), items.as_slice());
        assert!(restored.store().contains("cart"));

        Ok(())
    }

    #[test]
    fn add_saturates_quantity_at_max() -> TestResult {
        let mut ledger = ledger();

        ledger.add_item(&product("a", 1), u32::MAX)?;

        assert_eq!(ledger.add_one(&product("a", 1))?, AddOutcome::Merged);
        assert_eq!(ledger.quantity_of(&"a".into()), u32::MAX);

        ledger.increment(&"a".into());

        assert_eq!(ledger.quantity_of(&"a".into()), u32::MAX);

        Ok(())
    }

    #[test]
    fn compute_totals_reports_overflow() -> TestResult {
        let mut ledger = ledger();

        ledger.add_item(
            &Product::new("big", "Big", Money::from_minor(i64::MAX, USD)),
            2,
        )?;

        assert!(matches!(
            ledger.compute_totals(),
            Err(PricingError::Overflow)
        ));
        assert_eq!(ledger.quantity_of(&"big".into()), 2);

        Ok(())
    }

    #[test]
    fn load_discards_malformed_record() {
        let store = MemoryStore::with_record("cart", "{not json");

        let ledger = Ledger::load(store, LedgerConfig::default());

        assert!(ledger.is_empty());
        assert!(!ledger.store().contains("cart"));
    }

    #[test]
    fn load_survives_unreadable_store() {
        let ledger = Ledger::load(BrokenStore::default(), LedgerConfig::default());

        assert!(ledger.is_empty());
        assert_eq!(ledger.store().removes, 1);
    }

    #[test]
    fn failed_writes_keep_in_memory_state() -> TestResult {
        let mut ledger = Ledger::new(BrokenStore::default(), LedgerConfig::default());

        ledger.add_item(&product("a", 10), 2)?;
        ledger.add_item(&product("a", 10), 1)?;
        ledger.set_quantity(&"a".into(), 4);

        assert_eq!(ledger.quantity_of(&"a".into()), 4);

        ledger.clear();

        assert!(ledger.is_empty());

        Ok(())
    }

    #[test]
    fn compute_totals_matches_example() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(
            &product("lamp", 200).with_discount_price(Money::from_major(150, USD)),
            3,
        )?;

        let totals = ledger.compute_totals()?;

        assert_eq!(totals.subtotal(), Money::from_major(450, USD));
        assert_eq!(totals.tax(), Money::from_major(45, USD));
        assert_eq!(totals.shipping(), Money::from_major(50, USD));
        assert_eq!(totals.total(), Money::from_major(545, USD));
        assert_eq!(ledger.compute_totals()?, totals);

        Ok(())
    }

    #[test]
    fn savings_sums_line_savings() -> TestResult {
        let mut ledger = ledger();
        ledger.add_item(
            &product("lamp", 200).with_discount_price(Money::from_major(150, USD)),
            3,
        )?;
        ledger.add_one(&product("mug", 12))?;

        assert_eq!(ledger.savings()?, Money::from_major(150, USD));

        Ok(())
    }
}
