//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    checkout::{CheckoutError, OrderDraft, OrderItem, ShippingAddress},
    config::{DEFAULT_STORAGE_KEY, LedgerConfig},
    fixtures::{Catalog, FixtureError},
    items::LineItem,
    ledger::{AddOutcome, Ledger, LedgerError},
    logging::{LogFormat, LoggingError, init_logging},
    pricing::{PricingError, PricingPolicy, PricingSnapshot},
    products::{Product, ProductId},
    storage::{CartStore, FileStore, MemoryStore, StoreError},
    summary::{SummaryError, write_summary},
};
