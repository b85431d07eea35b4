use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use stockroom_infra::{ConfigError, StoreConfig};
use stockroom_inventory::{AisleId, Category, ProductId, ShelfId};
use stockroom_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "stockroom")]
#[command(about = "Single-warehouse inventory tracker")]
#[command(version)]
pub struct Cli {
    /// Workbook file (overrides STOCKROOM_WORKBOOK)
    #[arg(long, global = true)]
    pub workbook: Option<PathBuf>,

    /// Directory for CSV backups (overrides STOCKROOM_BACKUP_DIR)
    #[arg(long, global = true)]
    pub backup_dir: Option<PathBuf>,

    /// Low-stock threshold (overrides STOCKROOM_LOW_STOCK_THRESHOLD)
    #[arg(long, global = true)]
    pub low_stock: Option<u32>,

    /// Log output format: json or pretty
    #[arg(long, global = true, env = "STOCKROOM_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn store_config(&self) -> Result<StoreConfig, ConfigError> {
        let mut config = StoreConfig::from_env()?;
        if let Some(path) = &self.workbook {
            config.workbook_path = path.clone();
        }
        if let Some(dir) = &self.backup_dir {
            config.backup_dir = dir.clone();
        }
        if let Some(threshold) = self.low_stock {
            config.low_stock_threshold = threshold;
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the workbook if it does not exist
    Init,

    /// Totals and quantity per category
    Dashboard,

    /// Receive stock (creates the product on first receipt)
    Receive {
        product_id: ProductId,
        name: String,
        #[arg(long)]
        category: Category,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
        #[arg(long)]
        shelf: ShelfId,
        #[arg(long)]
        supplier: Option<String>,
    },

    /// List products in stock
    List {
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        aisle: Option<AisleId>,
        #[arg(long)]
        shelf: Option<ShelfId>,
        /// Only the N most recent entries, newest first
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Issue stock (removes the product when it reaches zero)
    Issue {
        product_id: ProductId,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },

    /// Edit a product; only fields that differ are written
    Edit {
        product_id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        /// New quantity; 0 removes the product
        #[arg(long)]
        quantity: Option<u32>,
        /// New shelf; the aisle follows
        #[arg(long)]
        shelf: Option<ShelfId>,
        /// New supplier; an empty string clears it
        #[arg(long)]
        supplier: Option<String>,
    },

    /// Shelf-by-shelf occupancy
    Map,

    /// Stock reports
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },

    /// Export the stock table to a timestamped CSV file
    Backup,

    /// Print the shelf layout
    Layout,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Products below the low-stock threshold
    LowStock,
    /// Quantity per aisle and shelf
    Locations,
    /// Latest entries
    Recent,
}
