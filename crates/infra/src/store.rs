//! Inventory store: durable CRUD over the stock table.
//!
//! Every mutation reads the full workbook, applies exactly one change to the
//! records section, and writes the full workbook back. Nothing is cached
//! between calls; callers reload with [`InventoryStore::load`] after a
//! mutation instead of trusting a copy they already hold.

use thiserror::Error;

use stockroom_core::DomainError;
use stockroom_inventory::{
    FieldUpdate, IssueOutcome, IssueStock, ProductId, ReceiptOutcome, ReceiveStock, ShelfId,
    ShelfLayout, StockFilter, StockTable, UpdateOutcome,
};

use crate::workbook::{Workbook, WorkbookBackend, WorkbookError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Why a store operation did not take effect.
///
/// None of these are fatal: the table is left as it was and the caller
/// decides what to tell the user.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("shelf {0} is not part of the warehouse layout")]
    UnknownShelf(ShelfId),

    #[error("rejected: {0}")]
    Rejected(DomainError),

    #[error("persistence failed")]
    Persistence(#[from] WorkbookError),
}

impl StoreError {
    fn from_domain(err: DomainError, product_id: &ProductId) -> Self {
        match err {
            DomainError::NotFound(_) => StoreError::NotFound(product_id.clone()),
            DomainError::InvariantViolation(msg) => StoreError::InvalidQuantity(msg),
            other => StoreError::Rejected(other),
        }
    }
}

fn rejected(product_id: &ProductId) -> impl FnOnce(DomainError) -> StoreError + '_ {
    move |err| StoreError::from_domain(err, product_id)
}

#[derive(Debug)]
pub struct InventoryStore<B>
where
    B: WorkbookBackend,
{
    backend: B,
    layout: ShelfLayout,
}

impl<B> InventoryStore<B>
where
    B: WorkbookBackend,
{
    /// Open a store over `backend`, loading the shelf layout once.
    pub fn new(backend: B) -> Self {
        let layout = load_layout(&backend);
        Self { backend, layout }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn layout(&self) -> &ShelfLayout {
        &self.layout
    }

    /// Create the workbook with empty records and the default layout if it
    /// does not exist yet. Returns whether a new workbook was written.
    ///
    /// A workbook that exists but cannot be read counts as present and is
    /// left untouched.
    pub fn initialize(&self) -> StoreResult<bool> {
        match self.backend.read() {
            Ok(Some(_)) => return Ok(false),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(location = %self.backend.location(), error = %err, "workbook present but unreadable; not initializing");
                return Ok(false);
            }
        }
        self.backend.write(&Workbook::fresh()).inspect_err(|err| {
            tracing::error!(location = %self.backend.location(), error = %err, "failed to initialize workbook");
        })?;
        tracing::info!(location = %self.backend.location(), "initialized empty workbook");
        Ok(true)
    }

    /// Current stock table.
    ///
    /// Fails soft: an absent or unreadable workbook yields an empty table.
    pub fn load(&self) -> StockTable {
        match self.read_workbook().and_then(|wb| wb.table()) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(location = %self.backend.location(), error = %err, "could not load stock; using empty table");
                StockTable::new()
            }
        }
    }

    /// Filtered view of the current stock table.
    pub fn list(&self, filter: &StockFilter) -> StockTable {
        self.load().list(filter)
    }

    /// Inbound movement: insert the product, or add to its quantity.
    pub fn receive(&self, cmd: &ReceiveStock) -> StoreResult<ReceiptOutcome> {
        if cmd.quantity == 0 {
            return Err(StoreError::InvalidQuantity(
                "received quantity must be at least 1".to_string(),
            ));
        }

        let outcome = self.mutate(&cmd.product_id, |table| {
            // A repeat receipt keeps the product where it is.
            if table.get(&cmd.product_id).is_none() && !self.layout.contains_shelf(&cmd.shelf) {
                return Err(StoreError::UnknownShelf(cmd.shelf.clone()));
            }
            table.receive(cmd).map_err(rejected(&cmd.product_id))
        })?;
        tracing::info!(
            product_id = %cmd.product_id,
            received = cmd.quantity,
            outcome = ?outcome,
            "stock received"
        );
        Ok(outcome)
    }

    /// Outbound movement: take `quantity` out, removing the record at zero.
    pub fn issue(&self, cmd: &IssueStock) -> StoreResult<IssueOutcome> {
        if cmd.quantity == 0 {
            return Err(StoreError::InvalidQuantity(
                "issued quantity must be at least 1".to_string(),
            ));
        }

        let outcome = self.mutate(&cmd.product_id, |table| {
            table.issue(cmd).map_err(rejected(&cmd.product_id))
        })?;
        tracing::info!(
            product_id = %cmd.product_id,
            issued = cmd.quantity,
            outcome = ?outcome,
            "stock issued"
        );
        Ok(outcome)
    }

    /// Overwrite one field of an existing record.
    pub fn update_field(
        &self,
        product_id: &ProductId,
        update: FieldUpdate,
    ) -> StoreResult<UpdateOutcome> {
        let column = update.column();
        let outcome = self.mutate(product_id, |table| {
            table.update_field(product_id, update).map_err(rejected(product_id))
        })?;
        tracing::info!(product_id = %product_id, column, outcome = ?outcome, "record updated");
        Ok(outcome)
    }

    /// Move a record to another shelf of the layout, updating shelf and aisle
    /// in one write.
    pub fn relocate(&self, product_id: &ProductId, shelf: ShelfId) -> StoreResult<()> {
        if !self.layout.contains_shelf(&shelf) {
            return Err(StoreError::UnknownShelf(shelf));
        }
        let target = shelf.clone();
        self.mutate(product_id, |table| {
            table.relocate(product_id, shelf).map_err(rejected(product_id))
        })?;
        tracing::info!(product_id = %product_id, shelf = %target, "record relocated");
        Ok(())
    }

    /// Strict read used by mutations: absent means fresh, unreadable is an error.
    fn read_workbook(&self) -> Result<Workbook, WorkbookError> {
        Ok(self.backend.read()?.unwrap_or_else(Workbook::fresh))
    }

    /// Read, apply one change, write back. Nothing is written when the change
    /// is rejected.
    fn mutate<T>(
        &self,
        product_id: &ProductId,
        change: impl FnOnce(&mut StockTable) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut workbook = self.read_workbook()?;
        let mut table = workbook.table()?;

        let outcome = change(&mut table).inspect_err(|err| {
            tracing::warn!(product_id = %product_id, error = %err, "stock change rejected");
        })?;

        workbook.set_table(table);
        self.backend.write(&workbook).map_err(|err| {
            tracing::error!(
                location = %self.backend.location(),
                product_id = %product_id,
                error = %err,
                "failed to persist workbook"
            );
            StoreError::Persistence(err)
        })?;
        Ok(outcome)
    }
}

/// Layout from the configuration section, or the default one when it is
/// missing, empty or unreadable.
fn load_layout<B: WorkbookBackend>(backend: &B) -> ShelfLayout {
    let layout = backend
        .read()
        .and_then(|wb| wb.map(|wb| wb.layout()).transpose());
    match layout {
        Ok(Some(layout)) if !layout.aisles().is_empty() => layout,
        Ok(_) => ShelfLayout::default(),
        Err(err) => {
            tracing::warn!(location = %backend.location(), error = %err, "could not load shelf layout; using default");
            ShelfLayout::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use stockroom_inventory::{AisleId, Category};

    use crate::workbook::{FileWorkbook, InMemoryWorkbook};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()
    }

    fn pid(s: &str) -> ProductId {
        ProductId::new(s).unwrap()
    }

    fn receipt(id: &str, category: Category, quantity: u32, shelf: &str, at: DateTime<Utc>) -> ReceiveStock {
        ReceiveStock {
            product_id: pid(id),
            name: "Widget".to_string(),
            category,
            quantity,
            shelf: ShelfId::new(shelf).unwrap(),
            supplier: Some("Acme".to_string()),
            received_at: at,
        }
    }

    fn issue(id: &str, quantity: u32) -> IssueStock {
        IssueStock { product_id: pid(id), quantity }
    }

    fn memory_store() -> InventoryStore<InMemoryWorkbook> {
        InventoryStore::new(InMemoryWorkbook::new())
    }

    #[test]
    fn receive_issue_lifecycle() {
        let store = memory_store();
        assert!(store.load().is_empty());

        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        let table = store.load();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&pid("P1")).unwrap().quantity, 5);

        let later = t0() + Duration::minutes(30);
        store.receive(&receipt("P1", Category::Home, 3, "A1", later)).unwrap();
        let record = store.load().get(&pid("P1")).cloned().unwrap();
        assert_eq!(record.quantity, 8);
        assert_eq!(record.entry_timestamp, later);

        assert_eq!(store.issue(&issue("P1", 8)).unwrap(), IssueOutcome::Depleted);
        assert!(store.load().is_empty());

        let err = store.issue(&issue("P1", 1)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.load().is_empty());
    }

    #[test]
    fn over_issue_is_rejected_without_writing() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        let before = store.backend().snapshot();

        let err = store.issue(&issue("P1", 6)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuantity(_)));
        assert_eq!(store.backend().snapshot(), before);
    }

    #[test]
    fn zero_quantities_are_invalid() {
        let store = memory_store();
        assert!(matches!(
            store.receive(&receipt("P1", Category::Home, 0, "A1", t0())),
            Err(StoreError::InvalidQuantity(_))
        ));
        assert!(matches!(store.issue(&issue("P1", 0)), Err(StoreError::InvalidQuantity(_))));
        assert!(store.backend().snapshot().is_none());
    }

    #[test]
    fn receive_rejects_shelf_outside_layout() {
        let store = memory_store();
        let err = store.receive(&receipt("P1", Category::Home, 1, "Z9", t0())).unwrap_err();
        assert!(matches!(err, StoreError::UnknownShelf(_)));
        assert!(store.load().is_empty());
    }

    #[test]
    fn repeat_receipt_ignores_shelf_outside_layout() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();

        let outcome = store.receive(&receipt("P1", Category::Home, 2, "Z9", t0())).unwrap();
        assert!(matches!(outcome, ReceiptOutcome::Restocked { .. }));
        let record = store.load().get(&pid("P1")).cloned().unwrap();
        assert_eq!((record.quantity, record.shelf.as_str()), (7, "A1"));
    }

    #[test]
    fn update_field_on_missing_product_fails() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        let before = store.load();

        let err = store
            .update_field(&pid("P9"), FieldUpdate::Name("Gadget".to_string()))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id.as_str() == "P9"));
        assert_eq!(store.load(), before);
    }

    #[test]
    fn update_field_persists_exactly_one_change() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        store.receive(&receipt("P2", Category::Books, 2, "B1", t0())).unwrap();
        let before = store.load();

        store
            .update_field(&pid("P1"), FieldUpdate::Supplier(Some("Globex".to_string())))
            .unwrap();

        let after = store.load();
        let mut expected = before.clone();
        expected
            .update_field(&pid("P1"), FieldUpdate::Supplier(Some("Globex".to_string())))
            .unwrap();
        assert_eq!(after, expected);
        assert_eq!(after.get(&pid("P2")), before.get(&pid("P2")));
    }

    #[test]
    fn shelf_edit_by_field_then_aisle() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();

        store
            .update_field(&pid("P1"), FieldUpdate::Shelf(ShelfId::new("B2").unwrap()))
            .unwrap();
        store
            .update_field(&pid("P1"), FieldUpdate::Aisle(AisleId::new("B").unwrap()))
            .unwrap();

        let record = store.load().get(&pid("P1")).cloned().unwrap();
        assert_eq!((record.shelf.as_str(), record.aisle.as_str()), ("B2", "B"));
    }

    #[test]
    fn relocate_validates_shelf_and_updates_aisle() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();

        assert!(matches!(
            store.relocate(&pid("P1"), ShelfId::new("X1").unwrap()),
            Err(StoreError::UnknownShelf(_))
        ));
        store.relocate(&pid("P1"), ShelfId::new("C2").unwrap()).unwrap();

        let record = store.load().get(&pid("P1")).cloned().unwrap();
        assert_eq!((record.shelf.as_str(), record.aisle.as_str()), ("C2", "C"));
    }

    #[test]
    fn list_by_category() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        store.receive(&receipt("P2", Category::Books, 1, "A2", t0())).unwrap();
        store.receive(&receipt("P3", Category::Home, 2, "B3", t0())).unwrap();

        let home = store.list(&StockFilter::new().category("Casa".parse().unwrap()));
        assert_eq!(home.len(), 2);
        assert!(home.iter().all(|r| r.category == Category::Home));
    }

    #[test]
    fn failed_write_surfaces_persistence_error_and_keeps_old_state() {
        let store = memory_store();
        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        let before = store.load();

        store.backend().set_fail_writes(true);
        let err = store.issue(&issue("P1", 2)).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(store.load(), before);

        store.backend().set_fail_writes(false);
        store.issue(&issue("P1", 2)).unwrap();
        assert_eq!(store.load().get(&pid("P1")).unwrap().quantity, 3);
    }

    #[test]
    fn mutations_keep_configuration_section() {
        let mut workbook = Workbook::fresh();
        workbook.config = vec!["X:X1,X2".to_string()];
        let store = InventoryStore::new(InMemoryWorkbook::with_workbook(workbook));

        store.receive(&receipt("P1", Category::Other, 1, "X2", t0())).unwrap();

        let persisted = store.backend().snapshot().unwrap();
        assert_eq!(persisted.config, vec!["X:X1,X2".to_string()]);
        assert_eq!(persisted.stock[0].aisle.as_str(), "X");
    }

    #[test]
    fn initialize_writes_once() {
        let store = memory_store();
        assert!(store.initialize().unwrap());
        assert_eq!(store.backend().snapshot(), Some(Workbook::fresh()));

        store.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        assert!(!store.initialize().unwrap());
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn empty_or_broken_layout_falls_back_to_default() {
        let empty = InventoryStore::new(InMemoryWorkbook::with_workbook(Workbook {
            stock: Vec::new(),
            config: Vec::new(),
        }));
        assert_eq!(empty.layout(), &ShelfLayout::default());

        let broken = InventoryStore::new(InMemoryWorkbook::with_workbook(Workbook {
            stock: Vec::new(),
            config: vec!["no separator".to_string()],
        }));
        assert_eq!(broken.layout(), &ShelfLayout::default());
    }

    #[test]
    fn unreadable_file_loads_empty_but_blocks_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        std::fs::write(&path, "{ definitely not a workbook").unwrap();
        let store = InventoryStore::new(FileWorkbook::new(&path));

        assert!(store.load().is_empty());
        let err = store.receive(&receipt("P1", Category::Home, 1, "A1", t0())).unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        // The damaged file is left for inspection.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ definitely not a workbook");
    }

    #[test]
    fn initialize_leaves_unreadable_workbook_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        std::fs::write(&path, "{ definitely not a workbook").unwrap();
        let store = InventoryStore::new(FileWorkbook::new(&path));

        assert!(!store.initialize().unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ definitely not a workbook");
    }

    #[test]
    fn persistence_error_keeps_its_cause_in_the_source_chain() {
        let store = memory_store();
        store.backend().set_fail_writes(true);
        let err = store.receive(&receipt("P1", Category::Home, 1, "A1", t0())).unwrap_err();

        assert_eq!(err.to_string(), "persistence failed");
        let cause = std::error::Error::source(&err).unwrap();
        assert_eq!(cause.to_string(), "workbook unavailable: writes disabled");
    }

    #[test]
    fn file_store_round_trip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");

        let writer = InventoryStore::new(FileWorkbook::new(&path));
        writer.initialize().unwrap();
        writer.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        writer.receive(&receipt("P2", Category::Books, 4, "C3", t0())).unwrap();
        writer.issue(&issue("P2", 1)).unwrap();

        let reader = InventoryStore::new(FileWorkbook::new(&path));
        let table = reader.load();
        assert_eq!(table, writer.load());
        assert_eq!(table.get(&pid("P2")).unwrap().quantity, 3);
        assert_eq!(table.records()[0].product_id.as_str(), "P1");
    }

    #[test]
    fn stores_sharing_a_backend_see_each_others_writes() {
        let backend = Arc::new(InMemoryWorkbook::new());
        let first = InventoryStore::new(Arc::clone(&backend));
        let second = InventoryStore::new(Arc::clone(&backend));

        first.receive(&receipt("P1", Category::Home, 5, "A1", t0())).unwrap();
        second.issue(&issue("P1", 2)).unwrap();

        assert_eq!(first.load().get(&pid("P1")).unwrap().quantity, 3);
    }
}
