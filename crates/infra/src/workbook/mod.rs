//! The workbook: the single persisted spreadsheet holding the stock records
//! and the shelf-layout configuration as two named sheets.

pub mod file;
pub mod in_memory;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use stockroom_inventory::{ShelfLayout, StockRecord, StockTable};

pub use file::FileWorkbook;
pub use in_memory::InMemoryWorkbook;

/// Sheet holding the stock records.
pub const SHEET_STOCK: &str = "estoque";
/// Sheet holding one `aisle:shelf,shelf,...` row per aisle.
pub const SHEET_CONFIG: &str = "configuracoes";

/// Whole-document model of the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub stock: Vec<StockRecord>,
    pub config: Vec<String>,
}

impl Workbook {
    /// Empty records section and the default layout.
    pub fn fresh() -> Self {
        Self {
            stock: Vec::new(),
            config: ShelfLayout::default().to_rows(),
        }
    }

    /// Records section as a validated table.
    pub fn table(&self) -> Result<StockTable, WorkbookError> {
        StockTable::from_records(self.stock.clone())
            .map_err(|e| WorkbookError::Invalid(format!("{SHEET_STOCK}: {e}")))
    }

    /// Configuration section as a layout.
    pub fn layout(&self) -> Result<ShelfLayout, WorkbookError> {
        ShelfLayout::from_rows(&self.config)
            .map_err(|e| WorkbookError::Invalid(format!("{SHEET_CONFIG}: {e}")))
    }

    /// Replace the records section, keeping the configuration section.
    pub fn set_table(&mut self, table: StockTable) {
        self.stock = table.into_records();
    }
}

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed workbook")]
    Malformed(#[from] calamine::XlsxError),

    #[error("could not encode workbook")]
    Encode(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid workbook contents: {0}")]
    Invalid(String),

    #[error("workbook unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the workbook document.
///
/// Reads and writes are whole-document: there is no partial update.
pub trait WorkbookBackend {
    /// Read the workbook; `Ok(None)` when nothing has been persisted yet.
    fn read(&self) -> Result<Option<Workbook>, WorkbookError>;

    /// Replace the persisted workbook.
    fn write(&self, workbook: &Workbook) -> Result<(), WorkbookError>;

    /// Human-readable location, for logs and messages.
    fn location(&self) -> String;
}

impl<B> WorkbookBackend for Arc<B>
where
    B: WorkbookBackend + ?Sized,
{
    fn read(&self) -> Result<Option<Workbook>, WorkbookError> {
        (**self).read()
    }

    fn write(&self, workbook: &Workbook) -> Result<(), WorkbookError> {
        (**self).write(workbook)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_workbook_has_empty_stock_and_default_layout() {
        let workbook = Workbook::fresh();
        assert!(workbook.stock.is_empty());
        assert_eq!(workbook.config[0], "A:A1,A2,A3,A4");
        assert_eq!(workbook.layout().unwrap(), ShelfLayout::default());
    }

    #[test]
    fn error_messages_leave_the_cause_to_the_chain() {
        let err = WorkbookError::Io {
            path: PathBuf::from("stock.xlsx"),
            source: std::io::Error::other("disk on fire"),
        };
        assert_eq!(err.to_string(), "i/o error on stock.xlsx");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invalid_layout_row_is_reported() {
        let workbook = Workbook {
            stock: Vec::new(),
            config: vec!["broken".to_string()],
        };
        assert!(matches!(workbook.layout(), Err(WorkbookError::Invalid(_))));
    }
}
