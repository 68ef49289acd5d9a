//! Ingest failures.
//!
//! Only conditions that make a whole file unusable are errors. A row that
//! fails normalization is dropped silently and never reaches this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload's extension is not one of the supported statement formats.
    #[error("Unsupported file type '{name}': expected .csv, .xls, .xlsx or .pdf")]
    UnsupportedExtension { name: String },

    /// No row names both an identifier column and an amount column.
    #[error("No transaction table found in {format} statement: no header row names both a reference column and an amount column")]
    HeaderNotFound { format: &'static str },

    /// A workbook opened cleanly but contains no sheets.
    #[error("{format} workbook contains no worksheets")]
    EmptyWorkbook { format: &'static str },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
