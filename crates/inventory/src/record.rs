use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::Entity;

use crate::category::Category;
use crate::ids::{AisleId, ProductId, ShelfId};

/// Timestamp layout used for listings and CSV exports, in local time.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of the stock table: a product currently in stock.
///
/// Field names double as the CSV export column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: ProductId,
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub shelf: ShelfId,
    pub aisle: AisleId,
    pub entry_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl StockRecord {
    /// Build a record placed on `shelf`, with the aisle derived from it.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        category: Category,
        quantity: u32,
        shelf: ShelfId,
        entry_timestamp: DateTime<Utc>,
        supplier: Option<String>,
    ) -> Self {
        let aisle = shelf.aisle();
        Self {
            product_id,
            name: name.into(),
            category,
            quantity,
            shelf,
            aisle,
            entry_timestamp,
            supplier,
        }
    }

    /// Entry time on the local clock.
    pub fn entry_timestamp_display(&self) -> String {
        self.entry_timestamp
            .with_timezone(&Local)
            .format(DISPLAY_TIMESTAMP_FORMAT)
            .to_string()
    }

    pub fn supplier_display(&self) -> &str {
        self.supplier.as_deref().unwrap_or("")
    }
}

impl Entity for StockRecord {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}
