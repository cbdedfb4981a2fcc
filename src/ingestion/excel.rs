use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Row, Value};

/// Column name given to a header cell that is empty.
const EMPTY_HEADER: &str = "__EMPTY";

/// Ingest the first sheet of a workbook file (`.xlsx`, `.xls`, `.ods`, etc.) into a `DataSet`.
pub fn ingest_excel_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    ingest_first_sheet(&mut workbook)
}

/// Ingest the first sheet of an in-memory workbook into a `DataSet`.
///
/// Behavior:
/// - Picks the first sheet by position
/// - Uses the decoder's used-cell range; its first row is the header row
/// - Empty header cells are named `__EMPTY`, repeated names get `_1`, `_2`, ... suffixes
/// - Fully blank rows are skipped
/// - Cells keep their primitive type; whole-number floats become integers
pub fn ingest_excel_from_bytes(bytes: &[u8]) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    ingest_first_sheet(&mut workbook)
}

/// List the sheet names of an in-memory workbook, in workbook order.
pub fn workbook_sheet_names(bytes: &[u8]) -> IngestionResult<Vec<String>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    Ok(workbook.sheet_names().to_vec())
}

fn ingest_first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> IngestionResult<DataSet> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestionError::InvalidInput {
            message: "workbook has no sheets".to_string(),
        })??;
    Ok(DataSet::new(rows_from_range(&range)))
}

fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Vec::new();
    };
    let headers = header_names(header_row);

    sheet_rows
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| {
            let mut row = Row::with_capacity(headers.len());
            for (name, cell) in headers.iter().zip(cells.iter()) {
                row.insert(name.as_str(), convert_cell(cell));
            }
            row
        })
        .collect()
}

/// Every header gets a distinct name. A repeated name takes the next free `_n` suffix for its
/// base, skipping suffixed names that are already in use.
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    let mut used: HashSet<String> = HashSet::with_capacity(cells.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    for cell in cells {
        let base = match cell {
            Data::Empty => EMPTY_HEADER.to_string(),
            other => cell_to_header_string(other),
        };
        let mut name = base.clone();
        if used.contains(&name) {
            let counter = next_suffix.entry(base.clone()).or_insert(1);
            while used.contains(&name) {
                name = format!("{base}_{counter}");
                *counter += 1;
            }
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) => match whole_float(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        _ => c.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => match whole_float(*f) {
            Some(i) => Value::Int64(i),
            None => Value::Float64(*f),
        },
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) | Data::Error(_) => {
            Value::Utf8(c.to_string())
        }
    }
}

fn whole_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
