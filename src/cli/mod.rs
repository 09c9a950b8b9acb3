use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally::{
    config::{DEFAULT_STORAGE_KEY, LedgerConfig},
    ledger::Ledger,
    logging::{LogFormat, init_logging},
    storage::{FileStore, validate_key},
};

mod cart;
mod catalog;
mod checkout;

#[derive(Debug, Parser)]
#[command(name = "tally", about = "Persistent shopping cart ledger", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct StoreArgs {
    /// Directory cart records are kept in
    #[arg(long, env = "TALLY_STORE_DIR", default_value = ".tally", global = true)]
    store_dir: PathBuf,

    /// Storage key of the cart record
    #[arg(long, default_value = DEFAULT_STORAGE_KEY, global = true)]
    key: String,
}

#[derive(Debug, Args)]
struct LoggingArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TALLY_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Log output format
    #[arg(
        long,
        env = "TALLY_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the cart and its totals
    Show,
    /// Add a catalog product to the cart
    Add(cart::AddArgs),
    /// Remove a product from the cart
    Remove(cart::RemoveArgs),
    /// Set the quantity of a product in the cart; zero removes it
    Set(cart::SetArgs),
    /// Empty the cart
    Clear,
    /// List the products of a catalog
    Catalog(catalog::CatalogArgs),
    /// Build the order payload for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        let Self {
            store,
            logging,
            command,
        } = self;

        init_logging(&logging.log_level, logging.log_format).map_err(|error| error.to_string())?;

        match command {
            Commands::Show => cart::show(&store.open()?),
            Commands::Add(args) => cart::add(&mut store.open()?, &args),
            Commands::Remove(args) => cart::remove(&mut store.open()?, &args),
            Commands::Set(args) => cart::set(&mut store.open()?, &args),
            Commands::Clear => {
                let mut ledger = store.open()?;
                ledger.clear();
                cart::show(&ledger)
            }
            Commands::Catalog(args) => catalog::run(&args),
            Commands::Checkout(args) => checkout::run(&mut store.open()?, args),
        }
    }
}

impl StoreArgs {
    fn open(&self) -> Result<Ledger<FileStore>, String> {
        validate_key(&self.key).map_err(|error| error.to_string())?;

        let config = LedgerConfig::default().with_storage_key(self.key.clone());

        Ok(Ledger::load(FileStore::new(self.store_dir.clone()), config))
    }
}
