//! Command-line front end for the item store.
//!
//! # Responsibility
//! - Parse configuration from flags and `ITEMSTORE_*` environment variables.
//! - Run one store operation per invocation and print the result as JSON.

use clap::{Args, Parser, Subcommand};
use itemstore_core::db::{open_db, open_db_in_memory};
use itemstore_core::{
    core_version, default_log_level, init_logging, ItemId, ItemSearchCond, ItemService,
    ItemUpdate, NewItem, SqliteItemRepository,
};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::path::PathBuf;

/// Item store CLI
#[derive(Parser)]
#[command(name = "itemstore")]
#[command(about = "Create, read, update and search stored items", long_about = None)]
struct Cli {
    /// SQLite database file; an in-memory store is used when omitted.
    #[arg(long, env = "ITEMSTORE_DB", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, env = "ITEMSTORE_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "ITEMSTORE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a new item and print it with its assigned id
    Add(ItemFields),

    /// Print one item, or `null` when it does not exist
    Get { id: ItemId },

    /// Overwrite name, price and quantity of an existing item
    Update {
        id: ItemId,
        #[command(flatten)]
        fields: ItemFields,
    },

    /// List items matching every given filter
    Find {
        /// Substring the item name must contain (case-sensitive)
        #[arg(long)]
        name: Option<String>,

        /// Inclusive upper bound on price; items without a price never match
        #[arg(long, allow_negative_numbers = true)]
        max_price: Option<i32>,
    },
}

#[derive(Args)]
struct ItemFields {
    name: String,

    #[arg(long, allow_negative_numbers = true)]
    price: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    quantity: Option<i32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }
    info!("event=cli_start module=cli status=ok core_version={}", core_version());

    let conn = open_connection(cli.db.as_ref())?;
    let service = ItemService::new(SqliteItemRepository::try_new(&conn)?);

    match cli.command {
        Command::Add(fields) => {
            let item =
                service.register_item(NewItem::new(fields.name, fields.price, fields.quantity))?;
            print_json(&item)?;
        }
        Command::Get { id } => {
            print_json(&service.get_item(id)?)?;
        }
        Command::Update { id, fields } => {
            let update = ItemUpdate::new(fields.name, fields.price, fields.quantity);
            print_json(&service.update_item(id, &update)?)?;
        }
        Command::Find { name, max_price } => {
            let items = service.search_items(&ItemSearchCond::new(name, max_price))?;
            info!("event=cli_find module=cli status=ok rows={}", items.len());
            print_json(&items)?;
        }
    }

    Ok(())
}

fn open_connection(path: Option<&PathBuf>) -> Result<Connection, Box<dyn Error>> {
    let conn = match path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    Ok(conn)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
