//! Infrastructure layer: workbook persistence, the inventory store, backup
//! export and configuration.

pub mod config;
pub mod export;
pub mod store;
pub mod workbook;

pub use config::{ConfigError, StoreConfig};
pub use export::{ExportError, backup_file_name, export_backup, write_csv};
pub use store::{InventoryStore, StoreError, StoreResult};
pub use workbook::{FileWorkbook, InMemoryWorkbook, Workbook, WorkbookBackend, WorkbookError};
