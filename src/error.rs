use thiserror::Error;

/// Convenience result type for ingestion and export operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion and sample-export functions.
///
/// This is a single error enum shared across CSV and spreadsheet handling. The user-facing
/// status line never shows these messages; they only reach [`crate::ingestion::IngestionObserver`]s
/// and direct library callers.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet decoding error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV decoding or encoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet encoding error (sample export).
    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// JSON encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input cannot be handled at all (e.g. a workbook without sheets).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}
