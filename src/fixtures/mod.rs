//! Fixtures
//!
//! Product catalogs loaded from YAML, standing in for the storefront catalog in the CLI and tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{fixtures::products::ProductsFixture, products::Product};

pub mod products;

/// Directory catalog sets are read from, relative to the working directory.
pub const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Product catalog keyed by product identifier
#[derive(Debug, Default)]
pub struct Catalog {
    products: FxHashMap<String, Product<'static>>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if products use different
    /// currencies.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Load the named catalog set from `./fixtures/catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in(DEFAULT_BASE_PATH, name)
    }

    /// Load the named catalog set from `<base_path>/catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let path = base_path.into().join("catalog").join(format!("{name}.yml"));

        Self::from_file(path)
    }

    /// Parse a catalog from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, a price cannot be parsed, or products use
    /// different currencies.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(contents)?;
        let mut catalog = Self::new();

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.into_product(&key)?;
            let currency = product.currency();

            // Validate currency consistency
            if let Some(existing_currency) = catalog.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                catalog.currency = Some(currency);
            }

            catalog.products.insert(key, product);
        }

        Ok(catalog)
    }

    /// Get a product by its key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'static>, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Products in key order
    pub fn iter(&self) -> impl Iterator<Item = &Product<'static>> {
        let mut products: Vec<_> = self.products.values().collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products.into_iter()
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_set_loads_storefront_catalog() -> TestResult {
        let catalog = Catalog::from_set("storefront")?;

        assert!(!catalog.is_empty());
        assert_eq!(catalog.currency()?, USD);

        let headphones = catalog.product("headphones")?;

        assert_eq!(headphones.name, "Wireless Headphones");
        assert_eq!(headphones.price, Money::from_major(200, USD));
        assert_eq!(headphones.discount_price, Some(Money::from_major(150, USD)));

        Ok(())
    }

    #[test]
    fn from_yaml_rejects_currency_mismatch() {
        let yaml = "products:\n  apple:\n    name: Apple\n    price: 1.00 USD\n  banana:\n    name: Banana\n    price: 1.00 GBP\n";

        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn from_file_reads_custom_path() -> TestResult {
        let tmp = tempfile::tempdir()?;
        let dir = tmp.path().join("catalog");

        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("tiny.yml"),
            "products:\n  tea:\n    name: Tea\n    price: 3.50 GBP\n    stock: 0\n",
        )?;

        let catalog = Catalog::from_set_in(tmp.path(), "tiny")?;
        let tea = catalog.product("tea")?;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.currency()?, GBP);
        assert!(!tea.has_stock_for(1));

        Ok(())
    }

    #[test]
    fn products_are_sorted_by_key() -> TestResult {
        let yaml = "products:\n  b:\n    name: B\n    price: 1 USD\n  a:\n    name: A\n    price: 2 USD\n";

        let catalog = Catalog::from_yaml(yaml)?;
        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["a", "b"]);

        Ok(())
    }

    #[test]
    fn product_not_found_returns_error() {
        assert!(matches!(
            Catalog::new().product("nonexistent"),
            Err(FixtureError::ProductNotFound(_))
        ));
    }

    #[test]
    fn empty_catalog_has_no_currency() {
        assert!(matches!(
            Catalog::new().currency(),
            Err(FixtureError::NoCurrency)
        ));
    }

    #[test]
    fn missing_set_is_io_error() {
        assert!(matches!(
            Catalog::from_set("does-not-exist"),
            Err(FixtureError::Io(_))
        ));
    }
}
