use std::io::{self, Write};

use clap::Args;
use tally::{
    checkout::{OrderDraft, ShippingAddress},
    ledger::Ledger,
    storage::FileStore,
};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name
    #[arg(long, default_value = "")]
    name: String,

    /// Contact phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Street address
    #[arg(long, default_value = "")]
    street: String,

    /// City
    #[arg(long, default_value = "")]
    city: String,

    /// State or region
    #[arg(long, default_value = "")]
    state: String,

    /// Country
    #[arg(long, default_value = "")]
    country: String,

    /// Postal code
    #[arg(long, default_value = "")]
    zip_code: String,

    /// Treat the order as placed and empty the cart
    #[arg(long)]
    place: bool,
}

pub(crate) fn run(ledger: &mut Ledger<FileStore>, args: CheckoutArgs) -> Result<(), String> {
    let address = ShippingAddress {
        name: args.name,
        phone: args.phone,
        street: args.street,
        city: args.city,
        state: args.state,
        country: args.country,
        zip_code: args.zip_code,
    };

    let draft = OrderDraft::from_ledger(ledger, address).map_err(|error| error.to_string())?;
    let json = draft.to_json().map_err(|error| error.to_string())?;

    writeln!(io::stdout().lock(), "{json}").map_err(|error| error.to_string())?;

    if args.place {
        ledger.clear();
    }

    Ok(())
}
