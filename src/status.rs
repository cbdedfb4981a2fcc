//! The user-facing status line.

use std::fmt;

use crate::ingestion::IngestionFormat;

/// Why an upload failed, as far as the user is told.
///
/// The decoder's own error is never part of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The spreadsheet could not be decoded.
    SpreadsheetDecode,
    /// The delimited text could not be parsed.
    DelimitedParse,
}

impl FailureKind {
    /// The failure kind reported for an upload of `format`.
    pub fn for_format(format: IngestionFormat) -> Self {
        match format {
            IngestionFormat::Excel => Self::SpreadsheetDecode,
            IngestionFormat::Csv => Self::DelimitedParse,
        }
    }

    /// Fixed message shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::SpreadsheetDecode => "Failed to read Excel file.",
            Self::DelimitedParse => "Failed to parse CSV file.",
        }
    }
}

/// Outcome message of the most recent upload attempt. Empty until the first attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status(String);

impl Status {
    /// Status after successfully loading `rows` rows.
    pub fn loaded(rows: usize, format: IngestionFormat) -> Self {
        Self(format!("Loaded {rows} rows from {} file.", format.label()))
    }

    /// Status after a failed upload.
    pub fn failed(kind: FailureKind) -> Self {
        Self(kind.message().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureKind, Status};
    use crate::ingestion::IngestionFormat;

    #[test]
    fn loaded_messages_name_the_format() {
        assert_eq!(
            Status::loaded(1, IngestionFormat::Csv).as_str(),
            "Loaded 1 rows from CSV file."
        );
        assert_eq!(
            Status::loaded(0, IngestionFormat::Excel).as_str(),
            "Loaded 0 rows from Excel file."
        );
    }

    #[test]
    fn failure_messages_are_fixed() {
        assert_eq!(
            Status::failed(FailureKind::for_format(IngestionFormat::Excel)).as_str(),
            "Failed to read Excel file."
        );
        assert_eq!(
            Status::failed(FailureKind::for_format(IngestionFormat::Csv)).as_str(),
            "Failed to parse CSV file."
        );
        assert!(Status::default().is_empty());
    }
}
