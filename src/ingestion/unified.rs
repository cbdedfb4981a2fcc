//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_upload`], which ingests an [`UploadedFile`] into an in-memory
//! [`crate::types::DataSet`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is chosen from the file name: names
//!   ending in `.xlsx` are spreadsheets, everything else is delimited text. File contents are
//!   never sniffed.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::csv::{self, CsvOptions};
use super::excel;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// File-name suffix that selects spreadsheet ingestion.
pub const SPREADSHEET_SUFFIX: &str = ".xlsx";

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestionFormat {
    /// Delimited text with a header row.
    Csv,
    /// Spreadsheet workbook (first sheet only).
    Excel,
}

impl IngestionFormat {
    /// Pick the format for an uploaded file name.
    ///
    /// This is a case-sensitive suffix check: `prices.xlsx` is a spreadsheet, while `prices.XLSX`,
    /// `prices.xls` and `prices` are all treated as delimited text.
    pub fn from_file_name(name: &str) -> Self {
        if name.ends_with(SPREADSHEET_SUFFIX) {
            Self::Excel
        } else {
            Self::Csv
        }
    }

    /// Human-readable label used in status messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
        }
    }
}

/// A user-supplied file: its name and raw content.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name as supplied by the user (used for format detection only).
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an upload from a name and content.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk; the upload name is the path's final component.
    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, detect the format from the file name.
    pub format: Option<IngestionFormat>,
    /// Delimited-text options.
    pub csv: CsvOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("csv", &self.csv)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            csv: CsvOptions::default(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl IngestionOptions {
    /// The format that will be used for `file`.
    pub fn format_for(&self, file: &UploadedFile) -> IngestionFormat {
        self.format
            .unwrap_or_else(|| IngestionFormat::from_file_name(&file.name))
    }
}

/// Unified ingestion entry point for uploaded files.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use price_master_upload::ingestion::{ingest_upload, IngestionOptions, UploadedFile};
///
/// # fn main() -> Result<(), price_master_upload::IngestionError> {
/// let file = UploadedFile::new("prices.csv", "Client_Code,Product_Code\nCLI-0001,PRD-0001\n");
/// let ds = ingest_upload(&file, &IngestionOptions::default())?;
/// assert_eq!(ds.row_count(), 1);
/// # Ok(())
/// # }
/// ```
pub fn ingest_upload(file: &UploadedFile, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let fmt = options.format_for(file);
    let ctx = IngestionContext {
        file_name: file.name.clone(),
        format: fmt,
    };

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_with_ragged_count(&file.bytes, &options.csv),
        IngestionFormat::Excel => excel::ingest_excel_from_bytes(&file.bytes).map(|ds| (ds, 0)),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok((ds, ragged_rows)) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: ds.row_count(),
                    ragged_rows: *ragged_rows,
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|(ds, _)| ds)
}

/// Read `path` from disk and ingest it with [`ingest_upload`].
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let file = UploadedFile::from_path(path)?;
    ingest_upload(&file, options)
}

fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Excel(calamine::Error::Io(_)) => IngestionSeverity::Critical,
        IngestionError::Excel(_) => IngestionSeverity::Error,
        IngestionError::XlsxWrite(_) | IngestionError::Json(_) => IngestionSeverity::Error,
        IngestionError::InvalidInput { .. } => IngestionSeverity::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::{IngestionFormat, IngestionOptions, UploadedFile};

    #[test]
    fn format_detection_is_a_case_sensitive_suffix_check() {
        assert_eq!(IngestionFormat::from_file_name("prices.xlsx"), IngestionFormat::Excel);
        assert_eq!(IngestionFormat::from_file_name("a.b.xlsx"), IngestionFormat::Excel);
        assert_eq!(IngestionFormat::from_file_name("prices.XLSX"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("prices.xls"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("prices.csv"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("prices"), IngestionFormat::Csv);
    }

    #[test]
    fn explicit_format_overrides_file_name() {
        let file = UploadedFile::new("export.txt", Vec::new());
        let opts = IngestionOptions {
            format: Some(IngestionFormat::Excel),
            ..Default::default()
        };
        assert_eq!(opts.format_for(&file), IngestionFormat::Excel);
        assert_eq!(IngestionOptions::default().format_for(&file), IngestionFormat::Csv);
    }
}
