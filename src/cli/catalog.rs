use std::io::{self, Write};

use clap::Args;
use rust_decimal::Decimal;
use tally::{fixtures::Catalog, products::Product};

#[derive(Debug, Args)]
pub(crate) struct CatalogArgs {
    /// Catalog set under ./fixtures/catalog
    #[arg(short, long, env = "TALLY_CATALOG", default_value = "storefront")]
    catalog: String,
}

pub(crate) fn run(args: &CatalogArgs) -> Result<(), String> {
    let catalog = Catalog::from_set(&args.catalog)
        .map_err(|error| format!("failed to load catalog {}: {error}", args.catalog))?;

    let mut out = io::stdout().lock();

    for product in catalog.iter() {
        let mut line = format!(
            "{:<16} {:<28} {:>12}",
            product.id.as_str(),
            product.name,
            product.effective_price().to_string()
        );

        if let Some(points) = sale_points(product) {
            line.push_str(&format!("  -{points}% (was {})", product.price));
        }

        if !product.has_stock_for(1) {
            line.push_str("  out of stock");
        }

        writeln!(out, "{line}").map_err(|error| error.to_string())?;
    }

    Ok(())
}

/// Whole percent points off the list price, only when the product is actually cheaper.
fn sale_points(product: &Product<'_>) -> Option<Decimal> {
    product
        .discount_percentage()
        .map(|percent| ((percent * Decimal::ONE) * Decimal::ONE_HUNDRED).normalize())
        .filter(|points| points.is_sign_positive() && !points.is_zero())
}
