//! Flat CSV export of the stock table, used for backups.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use thiserror::Error;

use stockroom_inventory::{StockRecord, StockTable};

/// Export column order.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "product_id",
    "name",
    "category",
    "quantity",
    "shelf",
    "aisle",
    "entry_timestamp",
    "supplier",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write csv")]
    Csv(#[from] csv::Error),

    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct ExportRow<'a> {
    product_id: &'a str,
    name: &'a str,
    category: &'a str,
    quantity: u32,
    shelf: &'a str,
    aisle: &'a str,
    entry_timestamp: String,
    supplier: &'a str,
}

impl<'a> From<&'a StockRecord> for ExportRow<'a> {
    fn from(r: &'a StockRecord) -> Self {
        Self {
            product_id: r.product_id.as_str(),
            name: &r.name,
            category: r.category.label(),
            quantity: r.quantity,
            shelf: r.shelf.as_str(),
            aisle: r.aisle.as_str(),
            entry_timestamp: r.entry_timestamp_display(),
            supplier: r.supplier_display(),
        }
    }
}

/// Write `table` as CSV with a header row, even when the table is empty.
pub fn write_csv<W: Write>(table: &StockTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(EXPORT_COLUMNS)?;
    for record in table {
        wtr.serialize(ExportRow::from(record))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// `backup_estoque_YYYYmmdd_HHMM.csv`, stamped on the local clock.
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("backup_estoque_{}.csv", at.with_timezone(&Local).format("%Y%m%d_%H%M"))
}

/// Write a timestamped backup of `table` into `dir` and return its path.
pub fn export_backup(table: &StockTable, dir: &Path, at: DateTime<Utc>) -> Result<PathBuf, ExportError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExportError::Io { path, source }
    };

    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(backup_file_name(at));
    let file = File::create(&path).map_err(io_err(&path))?;
    write_csv(table, file)?;

    tracing::info!(path = %path.display(), records = table.len(), "backup exported");
    Ok(path)
}
