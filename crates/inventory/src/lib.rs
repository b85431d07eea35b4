//! Inventory domain module.
//!
//! This crate contains the business rules for the warehouse stock table,
//! implemented purely as deterministic domain logic (no IO, no files, no
//! terminal output). Persistence lives in `stockroom-infra`.

pub mod category;
pub mod filter;
pub mod ids;
pub mod layout;
pub mod record;
pub mod report;
pub mod table;

pub use category::Category;
pub use filter::StockFilter;
pub use ids::{AisleId, ProductId, ShelfId};
pub use layout::{AisleShelves, ShelfLayout};
pub use record::{DISPLAY_TIMESTAMP_FORMAT, StockRecord};
pub use table::{
    FieldUpdate, IssueOutcome, IssueStock, ReceiptOutcome, ReceiveStock, StockTable, UpdateOutcome,
};
