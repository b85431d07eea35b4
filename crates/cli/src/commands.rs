//! Command handlers: one store operation each, then reload and render.

use std::io::Write;

use anyhow::Context;
use chrono::Utc;

use stockroom_infra::{FileWorkbook, InventoryStore, StoreConfig, StoreError, export_backup};
use stockroom_inventory::report;
use stockroom_inventory::{
    Category, FieldUpdate, IssueOutcome, IssueStock, ProductId, ReceiptOutcome, ReceiveStock,
    ShelfId, StockFilter, UpdateOutcome,
};

use crate::cli::{Command, ReportKind};
use crate::render;

type Store = InventoryStore<FileWorkbook>;

/// Run one command against the workbook named in `config`.
pub fn run<W: Write>(command: Command, config: &StoreConfig, out: &mut W) -> anyhow::Result<()> {
    let store = InventoryStore::new(FileWorkbook::new(&config.workbook_path));
    let created = store
        .initialize()
        .with_context(|| format!("failed to create workbook {}", config.workbook_path.display()))?;

    match command {
        Command::Init if created => {
            writeln!(out, "Created workbook at {}", config.workbook_path.display())?;
        }
        Command::Init => {
            writeln!(out, "Workbook ready at {}", config.workbook_path.display())?;
        }
        Command::Dashboard => {
            render::dashboard(out, &report::dashboard(&store.load()))?;
        }
        Command::Receive { product_id, name, category, quantity, shelf, supplier } => {
            let cmd = ReceiveStock {
                product_id,
                name,
                category,
                quantity,
                shelf,
                supplier,
                received_at: Utc::now(),
            };
            let outcome = store
                .receive(&cmd)
                .with_context(|| format!("could not receive {} x {}", cmd.quantity, cmd.product_id))?;
            report_receipt(out, &store, &cmd.product_id, outcome)?;
        }
        Command::List { category, aisle, shelf, recent } => {
            let filter = StockFilter { category, aisle, shelf, most_recent: recent };
            render::stock_table(out, &store.list(&filter))?;
        }
        Command::Issue { product_id, quantity } => {
            let cmd = IssueStock { product_id, quantity };
            let outcome = store
                .issue(&cmd)
                .with_context(|| format!("could not issue {} x {}", cmd.quantity, cmd.product_id))?;
            match outcome {
                IssueOutcome::Decremented { remaining } => {
                    writeln!(out, "Issued {quantity} of {}; {remaining} left.", cmd.product_id)?
                }
                IssueOutcome::Depleted => {
                    writeln!(out, "Issued {quantity} of {}; product is out of stock and was removed.", cmd.product_id)?
                }
            }
        }
        Command::Edit { product_id, name, category, quantity, shelf, supplier } => {
            edit(out, &store, &product_id, EditRequest { name, category, quantity, shelf, supplier })?;
        }
        Command::Map => {
            let map = report::warehouse_map(&store.load(), store.layout());
            render::warehouse_map(out, &map)?;
        }
        Command::Report { kind } => {
            let table = store.load();
            match kind {
                ReportKind::LowStock => {
                    let threshold = config.low_stock_threshold;
                    render::low_stock(out, &report::low_stock(&table, threshold), threshold)?;
                }
                ReportKind::Locations => {
                    render::locations(out, &report::stock_by_location(&table), &report::aisle_occupancy(&table))?;
                }
                ReportKind::Recent => {
                    render::stock_table(out, &report::recent_entries(&table, config.recent_entries))?;
                }
            }
        }
        Command::Backup => {
            let table = store.load();
            if table.is_empty() {
                writeln!(out, "Nothing to back up: no products in stock.")?;
            } else {
                let path = export_backup(&table, &config.backup_dir, Utc::now())
                    .context("backup failed")?;
                writeln!(out, "Backup written to {}", path.display())?;
            }
        }
        Command::Layout => {
            render::layout(out, store.layout())?;
        }
    }

    Ok(())
}

fn report_receipt<W: Write>(
    out: &mut W,
    store: &Store,
    product_id: &ProductId,
    outcome: ReceiptOutcome,
) -> anyhow::Result<()> {
    let table = store.load();
    let Some(record) = table.get(product_id) else {
        // Written but not readable back: the caller's view is stale.
        anyhow::bail!("product {product_id} was saved but could not be reloaded");
    };
    let verb = match outcome {
        ReceiptOutcome::Created { .. } => "Added",
        ReceiptOutcome::Restocked { .. } => "Restocked",
    };
    writeln!(
        out,
        "{verb} {} ({}): {} in stock on shelf {} (aisle {}).",
        record.name, record.product_id, record.quantity, record.shelf, record.aisle
    )?;
    Ok(())
}

/// Requested edits; `None` leaves a field alone.
struct EditRequest {
    name: Option<String>,
    category: Option<Category>,
    quantity: Option<u32>,
    shelf: Option<ShelfId>,
    supplier: Option<String>,
}

/// Apply each requested field that differs from the stored value, one write
/// per field. The target shelf is checked before anything is written.
fn edit<W: Write>(out: &mut W, store: &Store, product_id: &ProductId, req: EditRequest) -> anyhow::Result<()> {
    let current = store
        .load()
        .get(product_id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(product_id.clone()))?;

    let mut updates = Vec::new();
    if let Some(name) = req.name.filter(|n| n.trim() != current.name) {
        updates.push(FieldUpdate::Name(name));
    }
    if let Some(category) = req.category.filter(|c| *c != current.category) {
        updates.push(FieldUpdate::Category(category));
    }
    if let Some(supplier) = req.supplier {
        let supplier = Some(supplier.trim().to_string()).filter(|s| !s.is_empty());
        if supplier != current.supplier {
            updates.push(FieldUpdate::Supplier(supplier));
        }
    }
    let relocate_to = req.shelf.filter(|s| *s != current.shelf);
    // Quantity last: a zero quantity removes the record.
    let quantity = req.quantity.filter(|q| *q != current.quantity);

    if updates.is_empty() && relocate_to.is_none() && quantity.is_none() {
        writeln!(out, "No changes were made.")?;
        return Ok(());
    }
    if let Some(shelf) = relocate_to.as_ref().filter(|s| !store.layout().contains_shelf(s)) {
        return Err(StoreError::UnknownShelf(shelf.clone()))
            .with_context(|| format!("could not move {product_id}"));
    }

    for update in updates {
        let column = update.column();
        store
            .update_field(product_id, update)
            .with_context(|| format!("could not update {column} of {product_id}"))?;
    }
    if let Some(shelf) = relocate_to {
        store
            .relocate(product_id, shelf)
            .with_context(|| format!("could not move {product_id}"))?;
    }
    if let Some(quantity) = quantity {
        let outcome = store
            .update_field(product_id, FieldUpdate::Quantity(quantity))
            .with_context(|| format!("could not update quantity of {product_id}"))?;
        if outcome == UpdateOutcome::Removed {
            writeln!(out, "Quantity set to 0: {product_id} was removed.")?;
            return Ok(());
        }
    }

    match store.load().get(product_id) {
        Some(record) => writeln!(
            out,
            "Updated {} ({}): {} {} units on shelf {} (aisle {}), supplier {}.",
            record.name,
            record.product_id,
            record.category,
            record.quantity,
            record.shelf,
            record.aisle,
            if record.supplier_display().is_empty() { "-" } else { record.supplier_display() }
        )?,
        None => anyhow::bail!("product {product_id} was updated but could not be reloaded"),
    }
    Ok(())
}
