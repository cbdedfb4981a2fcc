//! CSV (delimited text) ingestion implementation.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{DataSet, Row, Value};

/// Column that collects fields past the header width, in record order.
pub const EXTRA_FIELDS_COLUMN: &str = "__parsed_extra";

/// Delimiters considered by [`detect_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Options for delimited-text ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter. If `None`, it is detected from the first non-empty line.
    pub delimiter: Option<u8>,
}

/// Ingest a CSV file into an in-memory [`DataSet`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> IngestionResult<DataSet> {
    let bytes = fs::read(path)?;
    ingest_csv_from_bytes(&bytes, options)
}

/// Ingest CSV content held in memory.
///
/// Rules:
///
/// - The first record is the header row; its fields become column names.
/// - Empty lines are skipped.
/// - Every value stays a string, empty fields included.
/// - Records shorter than the header only carry the columns they have; fields past the header
///   width are kept as a [`Value::List`] under [`EXTRA_FIELDS_COLUMN`].
pub fn ingest_csv_from_bytes(bytes: &[u8], options: &CsvOptions) -> IngestionResult<DataSet> {
    ingest_csv_with_ragged_count(bytes, options).map(|(ds, _)| ds)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(true)` and `flexible(true)`; a non-flexible reader
/// turns ragged records into errors.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<DataSet> {
    read_rows(rdr).map(|(rows, _)| DataSet::new(rows))
}

/// Like [`ingest_csv_from_bytes`], also returning how many records did not match the header width.
pub(crate) fn ingest_csv_with_ragged_count(
    bytes: &[u8],
    options: &CsvOptions,
) -> IngestionResult<(DataSet, usize)> {
    let delimiter = options.delimiter.unwrap_or_else(|| detect_delimiter(bytes));
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    let (rows, ragged) = read_rows(&mut rdr)?;
    Ok((DataSet::new(rows), ragged))
}

fn read_rows<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<(Vec<Row>, usize)> {
    let headers = rdr.headers()?.clone();

    let mut rows: Vec<Row> = Vec::new();
    let mut ragged = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.len() != headers.len() {
            ragged += 1;
        }

        let mut row = Row::with_capacity(headers.len());
        for (name, raw) in headers.iter().zip(record.iter()) {
            row.insert(name, Value::from(raw));
        }
        if record.len() > headers.len() {
            let extra = record.iter().skip(headers.len()).map(Value::from).collect();
            row.insert(EXTRA_FIELDS_COLUMN, Value::List(extra));
        }
        rows.push(row);
    }

    Ok((rows, ragged))
}

/// Guess the field delimiter from the first non-empty line of `bytes`.
///
/// Picks the candidate (`,` `;` tab `|`) occurring most often outside double quotes; falls back
/// to `,` when none occur.
pub fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for &b in first_line {
        if b == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(idx) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
            counts[idx] += 1;
        }
    }

    let mut best = 0usize;
    for idx in 1..counts.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }
    CANDIDATE_DELIMITERS[best]
}
