//! Downloadable sample templates.
//!
//! The template is a single fixed price-master record. It is encoded either as CSV or as an
//! `.xlsx` workbook with one sheet named `Sample`.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};

/// Template column names, in output order.
pub const COLUMNS: [&str; 8] = [
    "Client_Code",
    "Product_Code",
    "Fixed_Price",
    "Currency",
    "UoM",
    "Valid_From",
    "Valid_To",
    "Notes",
];

/// Sheet name used for the spreadsheet template.
pub const SAMPLE_SHEET_NAME: &str = "Sample";

/// One price-master line as it appears in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceMasterRecord {
    #[serde(rename = "Client_Code")]
    pub client_code: String,
    #[serde(rename = "Product_Code")]
    pub product_code: String,
    #[serde(rename = "Fixed_Price")]
    pub fixed_price: i64,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "UoM")]
    pub uom: String,
    #[serde(rename = "Valid_From")]
    pub valid_from: String,
    /// Open-ended when `None`.
    #[serde(rename = "Valid_To")]
    pub valid_to: Option<String>,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl PriceMasterRecord {
    /// The fixed sample line.
    pub fn sample() -> Self {
        Self {
            client_code: "CLI-0001".to_string(),
            product_code: "PRD-0001".to_string(),
            fixed_price: 120,
            currency: "INR".to_string(),
            uom: "PCS".to_string(),
            valid_from: "2025-01-01".to_string(),
            valid_to: None,
            notes: "Sample data".to_string(),
        }
    }
}

/// Output encodings for the sample template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Comma-separated text.
    Csv,
    /// Spreadsheet workbook.
    Xlsx,
}

impl SampleFormat {
    /// Download file name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "Price_Master_Sample.csv",
            Self::Xlsx => "Price_Master_Sample.xlsx",
        }
    }

    /// MIME type for this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// An encoded sample ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl SampleFile {
    /// Write the file into `dir` under its download name and return the full path.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> IngestionResult<PathBuf> {
        let path = dir.as_ref().join(self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Encode the fixed sample template in `format`.
///
/// Encoder failures are returned to the caller; they never affect an upload session's state.
pub fn export_sample(format: SampleFormat) -> IngestionResult<SampleFile> {
    let records = [PriceMasterRecord::sample()];
    let bytes = match format {
        SampleFormat::Csv => encode_csv(&records)?,
        SampleFormat::Xlsx => encode_xlsx(&records)?,
    };
    Ok(SampleFile {
        file_name: format.file_name(),
        content_type: format.content_type(),
        bytes,
    })
}

fn encode_csv(records: &[PriceMasterRecord]) -> IngestionResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.into_inner()
        .map_err(|e| IngestionError::Io(e.into_error()))
}

fn encode_xlsx(records: &[PriceMasterRecord]) -> IngestionResult<Vec<u8>> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(SAMPLE_SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        ws.write_string(0, col as u16, *name)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        ws.write_string(row, 0, &record.client_code)?;
        ws.write_string(row, 1, &record.product_code)?;
        ws.write_number(row, 2, record.fixed_price as f64)?;
        ws.write_string(row, 3, &record.currency)?;
        ws.write_string(row, 4, &record.uom)?;
        ws.write_string(row, 5, &record.valid_from)?;
        // Open-ended validity stays a blank cell.
        if let Some(valid_to) = &record.valid_to {
            ws.write_string(row, 6, valid_to)?;
        }
        ws.write_string(row, 7, &record.notes)?;
    }

    Ok(wb.save_to_buffer()?)
}
