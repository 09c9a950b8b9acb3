use std::io;

use clap::Args;
use tally::{
    fixtures::Catalog,
    ledger::{AddOutcome, Ledger},
    products::ProductId,
    storage::FileStore,
    summary::write_summary,
};

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Catalog product key
    product: String,

    /// Units to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,

    /// Catalog set under ./fixtures/catalog
    #[arg(short, long, env = "TALLY_CATALOG", default_value = "storefront")]
    catalog: String,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Product identifier
    product: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetArgs {
    /// Product identifier
    product: String,

    /// New quantity
    quantity: u32,
}

pub(crate) fn show(ledger: &Ledger<FileStore>) -> Result<(), String> {
    write_summary(io::stdout().lock(), ledger).map_err(|error| error.to_string())
}

pub(crate) fn add(ledger: &mut Ledger<FileStore>, args: &AddArgs) -> Result<(), String> {
    let catalog = Catalog::from_set(&args.catalog)
        .map_err(|error| format!("failed to load catalog {}: {error}", args.catalog))?;

    let product = catalog
        .product(&args.product)
        .map_err(|error| error.to_string())?;

    let wanted = ledger
        .quantity_of(&product.id)
        .saturating_add(args.quantity);

    if !product.has_stock_for(wanted) {
        return Err(format!(
            "{} has only {} in stock",
            product.name,
            product.stock.unwrap_or_default()
        ));
    }

    match ledger
        .add_item(product, args.quantity)
        .map_err(|error| error.to_string())?
    {
        AddOutcome::Ignored => Err("quantity must be at least 1".to_string()),
        AddOutcome::Inserted | AddOutcome::Merged => show(ledger),
    }
}

pub(crate) fn remove(ledger: &mut Ledger<FileStore>, args: &RemoveArgs) -> Result<(), String> {
    let product_id = ProductId::from(args.product.as_str());

    if ledger.remove_item(&product_id).is_none() {
        return Err(format!("{product_id} is not in the cart"));
    }

    show(ledger)
}

pub(crate) fn set(ledger: &mut Ledger<FileStore>, args: &SetArgs) -> Result<(), String> {
    let product_id = ProductId::from(args.product.as_str());

    if !ledger.contains_product(&product_id) {
        return Err(format!("{product_id} is not in the cart"));
    }

    ledger.set_quantity(&product_id, args.quantity);

    show(ledger)
}
