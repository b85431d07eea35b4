//! Plain-text rendering of tables and reports.

use std::collections::BTreeMap;
use std::io::{self, Write};

use stockroom_inventory::report::{AisleMap, DashboardSummary, LocationTotal, ShelfStatus};
use stockroom_inventory::{AisleId, ShelfLayout, StockRecord, StockTable};

const BAR_WIDTH: u64 = 40;

/// Left-aligned columns sized to their widest cell.
fn write_grid<W: Write>(out: &mut W, header: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    writeln!(out, "{}", grid_line(header, &widths))?;
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        writeln!(out, "{}", grid_line(&cells, &widths))?;
    }
    Ok(())
}

fn grid_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn record_row(r: &StockRecord) -> Vec<String> {
    vec![
        r.product_id.to_string(),
        r.name.clone(),
        r.category.to_string(),
        r.quantity.to_string(),
        r.shelf.to_string(),
        r.aisle.to_string(),
        r.entry_timestamp_display(),
        r.supplier_display().to_string(),
    ]
}

pub fn stock_table<W: Write>(out: &mut W, table: &StockTable) -> io::Result<()> {
    if table.is_empty() {
        return writeln!(out, "No products in stock.");
    }
    let rows: Vec<_> = table.iter().map(record_row).collect();
    write_grid(
        out,
        &["ID", "NAME", "CATEGORY", "QTY", "SHELF", "AISLE", "ENTRY", "SUPPLIER"],
        &rows,
    )?;
    writeln!(
        out,
        "\nShowing {} products with a total of {} items",
        table.len(),
        table.total_items()
    )
}

/// Horizontal bars scaled to the largest value.
fn bars<W: Write, K: core::fmt::Display>(
    out: &mut W,
    values: impl IntoIterator<Item = (K, u64)>,
) -> io::Result<()> {
    let values: Vec<(String, u64)> = values.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    let max = values.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    let label_width = values.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

    for (label, value) in values {
        let len = (value * BAR_WIDTH).div_ceil(max) as usize;
        writeln!(out, "{label:<label_width$}  {} {value}", "#".repeat(len))?;
    }
    Ok(())
}

pub fn dashboard<W: Write>(out: &mut W, summary: &DashboardSummary) -> io::Result<()> {
    writeln!(out, "Products:         {}", summary.products)?;
    writeln!(out, "Total items:      {}", summary.total_items)?;
    writeln!(out, "Categories:       {}", summary.categories)?;
    writeln!(out, "Occupied shelves: {}", summary.occupied_shelves)?;

    if !summary.items_per_category.is_empty() {
        writeln!(out, "\nItems per category")?;
        bars(out, summary.items_per_category.iter().map(|(c, q)| (c, *q)))?;
    }
    Ok(())
}

pub fn low_stock<W: Write>(out: &mut W, records: &[&StockRecord], threshold: u32) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No products below {threshold} units.");
    }
    let rows: Vec<_> = records
        .iter()
        .map(|r| vec![r.name.clone(), r.quantity.to_string(), r.shelf.to_string()])
        .collect();
    write_grid(out, &["NAME", "QTY", "SHELF"], &rows)?;
    writeln!(out, "\nWarning: {} products below {threshold} units!", records.len())
}

pub fn locations<W: Write>(
    out: &mut W,
    totals: &[LocationTotal],
    per_aisle: &BTreeMap<AisleId, u64>,
) -> io::Result<()> {
    if totals.is_empty() {
        return writeln!(out, "No products in stock.");
    }
    let rows: Vec<_> = totals
        .iter()
        .map(|t| vec![t.aisle.to_string(), t.shelf.to_string(), t.quantity.to_string()])
        .collect();
    write_grid(out, &["AISLE", "SHELF", "QTY"], &rows)?;

    writeln!(out, "\nOccupancy per aisle")?;
    bars(out, per_aisle.iter().map(|(a, q)| (a, *q)))
}

pub fn warehouse_map<W: Write>(out: &mut W, map: &[AisleMap]) -> io::Result<()> {
    for (i, aisle) in map.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "Aisle {}", aisle.aisle)?;
        for entry in &aisle.shelves {
            match entry.status {
                ShelfStatus::Available => writeln!(out, "  {:<6} available", entry.shelf.as_str())?,
                ShelfStatus::Occupied { products, items } => writeln!(
                    out,
                    "  {:<6} {products} products, {items} items",
                    entry.shelf.as_str()
                )?,
            }
        }
    }
    Ok(())
}

pub fn layout<W: Write>(out: &mut W, layout: &ShelfLayout) -> io::Result<()> {
    for row in layout.to_rows() {
        writeln!(out, "{row}")?;
    }
    Ok(())
}
