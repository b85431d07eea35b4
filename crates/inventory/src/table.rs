//! The stock table and the movements that change it.
//!
//! Every operation here is pure: it validates, mutates `self` only on
//! success, and reports what happened. Loading and persisting the table is the
//! store's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use stockroom_core::{DomainError, DomainResult};

use crate::category::Category;
use crate::filter::StockFilter;
use crate::ids::{AisleId, ProductId, ShelfId};
use crate::record::StockRecord;

/// Movement: ReceiveStock (inbound).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveStock {
    pub product_id: ProductId,
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub shelf: ShelfId,
    pub supplier: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Movement: IssueStock (outbound).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStock {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A single-field overwrite of an existing record.
///
/// No cross-field validation: setting `Shelf` leaves `Aisle` alone, so callers
/// editing a location update both (or use [`StockTable::relocate`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldUpdate {
    Name(String),
    Category(Category),
    Quantity(u32),
    Shelf(ShelfId),
    Aisle(AisleId),
    Supplier(Option<String>),
    EntryTimestamp(DateTime<Utc>),
}

impl FieldUpdate {
    /// Workbook column touched by this update.
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::Name(_) => "name",
            FieldUpdate::Category(_) => "category",
            FieldUpdate::Quantity(_) => "quantity",
            FieldUpdate::Shelf(_) => "shelf",
            FieldUpdate::Aisle(_) => "aisle",
            FieldUpdate::Supplier(_) => "supplier",
            FieldUpdate::EntryTimestamp(_) => "entry_timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptOutcome {
    /// First receipt: a new record was inserted.
    Created { quantity: u32 },
    /// Repeat receipt: quantity incremented, timestamp refreshed.
    Restocked { quantity: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    Decremented { remaining: u32 },
    /// Quantity reached zero and the record was removed.
    Depleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// A quantity edit to zero removed the record.
    Removed,
}

/// In-memory stock table, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockTable {
    records: Vec<StockRecord>,
}

impl StockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from persisted rows, enforcing the table invariants.
    pub fn from_records(records: Vec<StockRecord>) -> DomainResult<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(&record.product_id) {
                return Err(DomainError::conflict(format!(
                    "duplicate product_id {}",
                    record.product_id
                )));
            }
            if record.quantity == 0 {
                return Err(DomainError::invariant(format!(
                    "product {} stored with zero quantity",
                    record.product_id
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StockRecord> {
        self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&StockRecord> {
        self.records.iter().find(|r| &r.product_id == product_id)
    }

    fn position(&self, product_id: &ProductId) -> DomainResult<usize> {
        self.records
            .iter()
            .position(|r| &r.product_id == product_id)
            .ok_or_else(|| DomainError::not_found(product_id.as_str()))
    }

    /// Sum of quantities across all records.
    pub fn total_items(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.quantity)).sum()
    }

    /// Inbound movement.
    ///
    /// A repeat receipt only bumps quantity and timestamp; the name,
    /// category, supplier and shelf of the first registration are kept.
    pub fn receive(&mut self, cmd: &ReceiveStock) -> DomainResult<ReceiptOutcome> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("received quantity must be at least 1"));
        }

        if let Some(existing) = self.records.iter_mut().find(|r| r.product_id == cmd.product_id) {
            let quantity = existing
                .quantity
                .checked_add(cmd.quantity)
                .ok_or_else(|| DomainError::invariant("quantity overflow"))?;
            existing.quantity = quantity;
            existing.entry_timestamp = cmd.received_at;
            return Ok(ReceiptOutcome::Restocked { quantity });
        }

        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let supplier = cmd
            .supplier
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        self.records.push(StockRecord::new(
            cmd.product_id.clone(),
            cmd.name.trim(),
            cmd.category,
            cmd.quantity,
            cmd.shelf.clone(),
            cmd.received_at,
            supplier,
        ));
        Ok(ReceiptOutcome::Created { quantity: cmd.quantity })
    }

    /// Outbound movement. Draining to exactly zero removes the record.
    pub fn issue(&mut self, cmd: &IssueStock) -> DomainResult<IssueOutcome> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("issued quantity must be at least 1"));
        }

        let idx = self.position(&cmd.product_id)?;
        let available = self.records[idx].quantity;
        if cmd.quantity > available {
            return Err(DomainError::invariant(format!(
                "cannot issue {} of {}: only {available} in stock",
                cmd.quantity, cmd.product_id
            )));
        }

        let remaining = available - cmd.quantity;
        if remaining == 0 {
            self.records.remove(idx);
            Ok(IssueOutcome::Depleted)
        } else {
            self.records[idx].quantity = remaining;
            Ok(IssueOutcome::Decremented { remaining })
        }
    }

    /// Overwrite exactly one field of an existing record.
    pub fn update_field(
        &mut self,
        product_id: &ProductId,
        update: FieldUpdate,
    ) -> DomainResult<UpdateOutcome> {
        let idx = self.position(product_id)?;

        // A record never sits at zero.
        if update == FieldUpdate::Quantity(0) {
            self.records.remove(idx);
            return Ok(UpdateOutcome::Removed);
        }

        let record = &mut self.records[idx];
        match update {
            FieldUpdate::Name(name) => {
                if name.trim().is_empty() {
                    return Err(DomainError::validation("name cannot be empty"));
                }
                record.name = name.trim().to_string();
            }
            FieldUpdate::Category(category) => record.category = category,
            FieldUpdate::Quantity(quantity) => record.quantity = quantity,
            FieldUpdate::Shelf(shelf) => record.shelf = shelf,
            FieldUpdate::Aisle(aisle) => record.aisle = aisle,
            FieldUpdate::Supplier(supplier) => {
                record.supplier = supplier.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
            }
            FieldUpdate::EntryTimestamp(at) => record.entry_timestamp = at,
        }
        Ok(UpdateOutcome::Updated)
    }

    /// Move a record to `shelf`, recomputing its aisle.
    pub fn relocate(&mut self, product_id: &ProductId, shelf: ShelfId) -> DomainResult<()> {
        let idx = self.position(product_id)?;
        let record = &mut self.records[idx];
        record.aisle = shelf.aisle();
        record.shelf = shelf;
        Ok(())
    }

    /// Records matching `filter`, in insertion order (or most-recent-first
    /// when the filter asks for the latest entries).
    pub fn list(&self, filter: &StockFilter) -> StockTable {
        let mut records: Vec<StockRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        if let Some(n) = filter.most_recent {
            // Stable sort: ties keep insertion order.
            records.sort_by(|a, b| b.entry_timestamp.cmp(&a.entry_timestamp));
            records.truncate(n);
        }

        StockTable { records }
    }
}

impl<'a> IntoIterator for &'a StockTable {
    type Item = &'a StockRecord;
    type IntoIter = std::slice::Iter<'a, StockRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
