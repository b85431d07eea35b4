use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_xlsxwriter::{Worksheet, XlsxError};

use stockroom_inventory::{AisleId, Category, ProductId, ShelfId, StockRecord};

use super::{SHEET_CONFIG, SHEET_STOCK, Workbook, WorkbookBackend, WorkbookError};

pub const COL_PRODUCT_ID: &str = "produto_id";
pub const COL_NAME: &str = "nome_produto";
pub const COL_CATEGORY: &str = "categoria";
pub const COL_QUANTITY: &str = "quantidade";
pub const COL_SHELF: &str = "prateleira";
pub const COL_AISLE: &str = "corredor";
pub const COL_ENTRY: &str = "data_entrada";
pub const COL_SUPPLIER: &str = "fornecedor";

/// Header row of the records sheet, in the order columns are written.
pub const STOCK_COLUMNS: [&str; 8] = [
    COL_PRODUCT_ID,
    COL_NAME,
    COL_CATEGORY,
    COL_QUANTITY,
    COL_SHELF,
    COL_AISLE,
    COL_ENTRY,
    COL_SUPPLIER,
];

/// Header of the single column of the configuration sheet.
pub const CONFIG_COLUMN: &str = "prateleiras";

/// Workbook stored as an `.xlsx` spreadsheet on local disk.
///
/// Writes go to a sibling `.tmp` file and are renamed into place, so readers
/// see either the old or the new spreadsheet, never a truncated one.
///
/// Columns are located by header name when reading, so sheets saved by other
/// tools load as long as the headers match. Entry timestamps are written as
/// RFC 3339 text in local time; timestamps without an offset are read as
/// local wall-clock time.
#[derive(Debug, Clone)]
pub struct FileWorkbook {
    path: PathBuf,
}

impl FileWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: io::Error) -> WorkbookError {
        WorkbookError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl WorkbookBackend for FileWorkbook {
    fn read(&self) -> Result<Option<Workbook>, WorkbookError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => return Err(self.io_error(io::Error::other("is a directory"))),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        }

        let mut xlsx: Xlsx<_> = open_workbook(&self.path)?;
        let stock = match sheet(&mut xlsx, SHEET_STOCK)? {
            Some(range) => stock_rows(&range)?,
            None => Vec::new(),
        };
        let config = match sheet(&mut xlsx, SHEET_CONFIG)? {
            Some(range) => config_rows(&range),
            None => Vec::new(),
        };
        Ok(Some(Workbook { stock, config }))
    }

    fn write(&self, workbook: &Workbook) -> Result<(), WorkbookError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut xlsx = rust_xlsxwriter::Workbook::new();
        write_stock_sheet(xlsx.add_worksheet(), &workbook.stock)?;
        write_config_sheet(xlsx.add_worksheet(), &workbook.config)?;

        let tmp = self.temp_path();
        if let Err(e) = xlsx.save(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn sheet<RS: Read + Seek>(xlsx: &mut Xlsx<RS>, name: &str) -> Result<Option<Range<Data>>, WorkbookError> {
    if !xlsx.sheet_names().iter().any(|s| s == name) {
        return Ok(None);
    }
    Ok(Some(xlsx.worksheet_range(name)?))
}

fn invalid(msg: String) -> WorkbookError {
    WorkbookError::Invalid(msg)
}

/// Header positions of the records sheet.
struct StockColumns {
    product_id: usize,
    name: usize,
    category: usize,
    quantity: usize,
    shelf: usize,
    aisle: Option<usize>,
    entry: usize,
    supplier: Option<usize>,
}

impl StockColumns {
    fn from_header(header: &[Data]) -> Result<Self, WorkbookError> {
        let find = |name: &str| header.iter().position(|c| cell_text(c).as_deref() == Some(name));
        let require = |name: &str| {
            find(name).ok_or_else(|| invalid(format!("{SHEET_STOCK}: missing column {name}")))
        };
        Ok(Self {
            product_id: require(COL_PRODUCT_ID)?,
            name: require(COL_NAME)?,
            category: require(COL_CATEGORY)?,
            quantity: require(COL_QUANTITY)?,
            shelf: require(COL_SHELF)?,
            aisle: find(COL_AISLE),
            entry: require(COL_ENTRY)?,
            supplier: find(COL_SUPPLIER),
        })
    }

    fn record(&self, row: &[Data]) -> Result<StockRecord, String> {
        let cell = |i: usize| row.get(i).unwrap_or(&Data::Empty);
        let text = |i: usize, column: &str| cell_text(cell(i)).ok_or_else(|| format!("{column} is empty"));

        let product_id = ProductId::new(text(self.product_id, COL_PRODUCT_ID)?).map_err(|e| e.to_string())?;
        let category = text(self.category, COL_CATEGORY)?
            .parse::<Category>()
            .map_err(|e| e.to_string())?;
        let quantity = cell_u32(cell(self.quantity))
            .ok_or_else(|| format!("{COL_QUANTITY} must be a whole number of units"))?;
        let shelf = ShelfId::new(text(self.shelf, COL_SHELF)?).map_err(|e| e.to_string())?;
        let aisle = match self.aisle.and_then(|i| cell_text(cell(i))) {
            Some(aisle) => AisleId::new(aisle).map_err(|e| e.to_string())?,
            None => shelf.aisle(),
        };
        let entry_timestamp = cell_timestamp(cell(self.entry))
            .ok_or_else(|| format!("{COL_ENTRY} is not a date"))?;

        Ok(StockRecord {
            product_id,
            name: text(self.name, COL_NAME)?,
            category,
            quantity,
            shelf,
            aisle,
            entry_timestamp,
            supplier: self.supplier.and_then(|i| cell_text(cell(i))),
        })
    }
}

fn stock_rows(range: &Range<Data>) -> Result<Vec<StockRecord>, WorkbookError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = StockColumns::from_header(header)?;

    rows.enumerate()
        .filter(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(i, row)| {
            // +2: one for the header, one for 1-based row numbers.
            columns
                .record(row)
                .map_err(|msg| invalid(format!("{SHEET_STOCK} row {}: {msg}", i + 2)))
        })
        .collect()
}

fn config_rows(range: &Range<Data>) -> Vec<String> {
    let mut rows = range.rows();
    let column = rows
        .next()
        .and_then(|header| header.iter().position(|c| cell_text(c).as_deref() == Some(CONFIG_COLUMN)))
        .unwrap_or(0);
    rows.filter_map(|row| row.get(column).and_then(cell_text)).collect()
}

/// Trimmed, non-empty text of a cell. Whole numbers lose their `.0`, so
/// numeric product ids read back as typed.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) | Data::DateTimeIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

fn cell_u32(cell: &Data) -> Option<u32> {
    match cell {
        Data::Int(i) => u32::try_from(*i).ok(),
        Data::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f) => Some(*f as u32),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell_timestamp(cell: &Data) -> Option<DateTime<Utc>> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().and_then(from_local),
        Data::String(s) | Data::DateTimeIso(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(from_local)
}

fn from_local(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

fn timestamp_cell(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn write_stock_sheet(sheet: &mut Worksheet, records: &[StockRecord]) -> Result<(), XlsxError> {
    sheet.set_name(SHEET_STOCK)?;
    for (col, name) in (0u16..).zip(STOCK_COLUMNS) {
        sheet.write_string(0, col, name)?;
    }
    for (row, r) in (1u32..).zip(records) {
        let entry = timestamp_cell(r.entry_timestamp);
        sheet.write_string(row, 0, r.product_id.as_str())?;
        sheet.write_string(row, 1, r.name.as_str())?;
        sheet.write_string(row, 2, r.category.label())?;
        sheet.write_number(row, 3, f64::from(r.quantity))?;
        sheet.write_string(row, 4, r.shelf.as_str())?;
        sheet.write_string(row, 5, r.aisle.as_str())?;
        sheet.write_string(row, 6, entry.as_str())?;
        if let Some(supplier) = &r.supplier {
            sheet.write_string(row, 7, supplier.as_str())?;
        }
    }
    Ok(())
}

fn write_config_sheet(sheet: &mut Worksheet, rows: &[String]) -> Result<(), XlsxError> {
    sheet.set_name(SHEET_CONFIG)?;
    sheet.write_string(0, 0, CONFIG_COLUMN)?;
    for (row, line) in (1u32..).zip(rows) {
        sheet.write_string(row, 0, line.as_str())?;
    }
    Ok(())
}
