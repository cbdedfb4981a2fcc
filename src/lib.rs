//! `price-master-upload` ingests an uploaded price-master file (CSV or `.xlsx`) into an in-memory
//! [`types::DataSet`], keeps a one-line [`status::Status`] describing the outcome, and derives a
//! small [`preview::Preview`] table from the rows. It can also produce sample templates of the
//! expected file layout.
//!
//! There is no pricing logic and no schema validation: every upload is read as-is, with column
//! names taken from its header row.
//!
//! ## What you can upload
//!
//! - **Spreadsheet**: any file whose name ends in `.xlsx` (case-sensitive). Only the first sheet is
//!   read; its first used row is the header.
//! - **Delimited text**: everything else. The first record is the header, empty lines are skipped,
//!   and the delimiter (`,` `;` tab `|`) is detected from the first line.
//!
//! The format is decided by the file name alone; content is never sniffed.
//!
//! ## Quick example: an upload session
//!
//! ```rust
//! use price_master_upload::ingestion::UploadedFile;
//! use price_master_upload::session::UploadSession;
//! use price_master_upload::types::Value;
//!
//! let mut session = UploadSession::default();
//! session.ingest(Some(UploadedFile::new(
//!     "prices.csv",
//!     "Client_Code,Product_Code\nCLI-0001,PRD-0001\n",
//! )));
//!
//! assert_eq!(session.status().as_str(), "Loaded 1 rows from CSV file.");
//! assert_eq!(
//!     session.dataset().rows[0].get("Product_Code"),
//!     Some(&Value::from("PRD-0001"))
//! );
//!
//! let preview = session.preview().unwrap();
//! assert_eq!(preview.columns, vec!["Client_Code", "Product_Code"]);
//! ```
//!
//! Failed uploads only change the status line; the previous rows stay in place:
//!
//! ```rust
//! use price_master_upload::ingestion::UploadedFile;
//! use price_master_upload::session::UploadSession;
//!
//! let mut session = UploadSession::default();
//! session.ingest(Some(UploadedFile::new("broken.xlsx", b"not a workbook".to_vec())));
//! assert_eq!(session.status().as_str(), "Failed to read Excel file.");
//! assert!(session.dataset().is_empty());
//! ```
//!
//! ## Sample templates
//!
//! ```rust
//! use price_master_upload::sample::{export_sample, SampleFormat};
//!
//! # fn main() -> Result<(), price_master_upload::IngestionError> {
//! let file = export_sample(SampleFormat::Csv)?;
//! assert_eq!(file.file_name, "Price_Master_Sample.csv");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format dispatch, CSV/spreadsheet decoders, observers
//! - [`session`]: the owner of the current rows and status, sync and background uploads
//! - [`types`]: rows, values and the dataset
//! - [`status`]: user-facing status messages
//! - [`preview`]: the first-rows preview table
//! - [`sample`]: downloadable templates
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod preview;
pub mod sample;
pub mod session;
pub mod status;
pub mod types;

pub use error::{IngestionError, IngestionResult};
