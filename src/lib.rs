//! Tally
//!
//! Tally is a persistent shopping cart ledger for a storefront. It keeps the line items a
//! shopper has chosen, survives restarts through a pluggable key-value store, and prices the
//! cart with tax and a free-shipping threshold.

pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod items;
pub mod ledger;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod storage;
pub mod summary;
