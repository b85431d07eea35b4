//! Read-only reports over the stock table (dashboard, low stock, locations,
//! warehouse map).

use std::collections::{BTreeMap, BTreeSet};

use crate::category::Category;
use crate::filter::StockFilter;
use crate::ids::{AisleId, ShelfId};
use crate::layout::ShelfLayout;
use crate::record::StockRecord;
use crate::table::StockTable;

/// Threshold below which a product counts as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// How many entries the "recent entries" report shows.
pub const DEFAULT_RECENT_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub products: usize,
    pub total_items: u64,
    pub categories: usize,
    pub occupied_shelves: usize,
    /// Total quantity per category, only categories present in stock.
    pub items_per_category: BTreeMap<Category, u64>,
}

pub fn dashboard(table: &StockTable) -> DashboardSummary {
    let mut items_per_category = BTreeMap::new();
    let mut shelves = BTreeSet::new();
    for record in table {
        *items_per_category.entry(record.category).or_insert(0) += u64::from(record.quantity);
        shelves.insert(&record.shelf);
    }

    DashboardSummary {
        products: table.len(),
        total_items: table.total_items(),
        categories: items_per_category.len(),
        occupied_shelves: shelves.len(),
        items_per_category,
    }
}

/// Records with `quantity < threshold`, in table order.
pub fn low_stock(table: &StockTable, threshold: u32) -> Vec<&StockRecord> {
    table.iter().filter(|r| r.quantity < threshold).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTotal {
    pub aisle: AisleId,
    pub shelf: ShelfId,
    pub quantity: u64,
}

/// Total quantity per (aisle, shelf), sorted by aisle then shelf.
pub fn stock_by_location(table: &StockTable) -> Vec<LocationTotal> {
    let mut totals: BTreeMap<(&AisleId, &ShelfId), u64> = BTreeMap::new();
    for record in table {
        *totals.entry((&record.aisle, &record.shelf)).or_insert(0) += u64::from(record.quantity);
    }
    totals
        .into_iter()
        .map(|((aisle, shelf), quantity)| LocationTotal {
            aisle: aisle.clone(),
            shelf: shelf.clone(),
            quantity,
        })
        .collect()
}

/// Total quantity per aisle.
pub fn aisle_occupancy(table: &StockTable) -> BTreeMap<AisleId, u64> {
    let mut totals = BTreeMap::new();
    for record in table {
        *totals.entry(record.aisle.clone()).or_insert(0) += u64::from(record.quantity);
    }
    totals
}

/// Latest `n` entries by timestamp, newest first.
pub fn recent_entries(table: &StockTable, n: usize) -> StockTable {
    table.list(&StockFilter::new().most_recent(n))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfStatus {
    Available,
    Occupied { products: usize, items: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfMapEntry {
    pub shelf: ShelfId,
    pub status: ShelfStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AisleMap {
    pub aisle: AisleId,
    pub shelves: Vec<ShelfMapEntry>,
}

/// Every shelf of the layout with what is stored on it.
///
/// Records on shelves outside the layout are not shown.
pub fn warehouse_map(table: &StockTable, layout: &ShelfLayout) -> Vec<AisleMap> {
    layout
        .aisles()
        .iter()
        .map(|entry| AisleMap {
            aisle: entry.aisle.clone(),
            shelves: entry
                .shelves
                .iter()
                .map(|shelf| {
                    let (products, items) = table
                        .iter()
                        .filter(|r| &r.shelf == shelf)
                        .fold((0usize, 0u64), |(n, q), r| (n + 1, q + u64::from(r.quantity)));
                    let status = if products == 0 {
                        ShelfStatus::Available
                    } else {
                        ShelfStatus::Occupied { products, items }
                    };
                    ShelfMapEntry { shelf: shelf.clone(), status }
                })
                .collect(),
        })
        .collect()
}
