//! Adapter selection: one variant per accepted statement format.

use std::path::Path;
use tracing::info;
use utrsync_core::ExtractedRecord;

use crate::error::{IngestError, Result};
use crate::layout::HeaderStrategy;
use crate::parsers::{delimited, legacy_sheet, modern_sheet, pdf_statement};

pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx", "pdf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAdapter {
    DelimitedText(HeaderStrategy),
    LegacySpreadsheet(HeaderStrategy),
    ModernSpreadsheet(HeaderStrategy),
    PdfStatement,
}

impl FormatAdapter {
    /// Pick the adapter for an uploaded file name by its extension (any case).
    /// Anything else is rejected before the file is read.
    pub fn for_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(Self::DelimitedText(HeaderStrategy::Catalog)),
            Some("xls") => Ok(Self::LegacySpreadsheet(HeaderStrategy::Catalog)),
            Some("xlsx") => Ok(Self::ModernSpreadsheet(HeaderStrategy::Catalog)),
            Some("pdf") => Ok(Self::PdfStatement),
            _ => Err(IngestError::UnsupportedExtension {
                name: name.to_string(),
            }),
        }
    }

    /// Apply a fixed header offset. PDF text has no header row to pin.
    pub fn with_strategy(self, strategy: HeaderStrategy) -> Self {
        match self {
            Self::DelimitedText(_) => Self::DelimitedText(strategy),
            Self::LegacySpreadsheet(_) => Self::LegacySpreadsheet(strategy),
            Self::ModernSpreadsheet(_) => Self::ModernSpreadsheet(strategy),
            Self::PdfStatement => Self::PdfStatement,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::DelimitedText(_) => delimited::FORMAT,
            Self::LegacySpreadsheet(_) => legacy_sheet::FORMAT,
            Self::ModernSpreadsheet(_) => modern_sheet::FORMAT,
            Self::PdfStatement => pdf_statement::FORMAT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DelimitedText(_) => "Delimited text",
            Self::LegacySpreadsheet(_) => "Legacy spreadsheet",
            Self::ModernSpreadsheet(_) => "Spreadsheet",
            Self::PdfStatement => "PDF statement",
        }
    }

    pub fn extract(&self, bytes: &[u8]) -> Result<Vec<ExtractedRecord>> {
        let records = match *self {
            Self::DelimitedText(strategy) => delimited::extract(bytes, strategy)?,
            Self::LegacySpreadsheet(strategy) => legacy_sheet::extract(bytes, strategy)?,
            Self::ModernSpreadsheet(strategy) => modern_sheet::extract(bytes, strategy)?,
            Self::PdfStatement => pdf_statement::extract(bytes)?,
        };
        info!(format = self.key(), records = records.len(), "extracted statement records");
        Ok(records)
    }

    pub fn extract_file(&self, path: &Path) -> Result<Vec<ExtractedRecord>> {
        let bytes = std::fs::read(path)?;
        self.extract(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_selects_by_extension_any_case() {
        assert_eq!(
            FormatAdapter::for_file_name("april.CSV").unwrap(),
            FormatAdapter::DelimitedText(HeaderStrategy::Catalog)
        );
        assert_eq!(FormatAdapter::for_file_name("a.xls").unwrap().key(), "xls");
        assert_eq!(FormatAdapter::for_file_name("a.b.XLSX").unwrap().key(), "xlsx");
        assert_eq!(FormatAdapter::for_file_name("scan.pdf").unwrap(), FormatAdapter::PdfStatement);
    }

    #[test]
    fn test_rejects_other_extensions() {
        for name in ["statement.txt", "statement", "csv", "x.xlsm"] {
            assert!(matches!(
                FormatAdapter::for_file_name(name),
                Err(IngestError::UnsupportedExtension { .. })
            ));
        }
    }

    #[test]
    fn test_with_strategy_leaves_pdf_alone() {
        let fixed = HeaderStrategy::Fixed { skip: 3 };
        assert_eq!(
            FormatAdapter::PdfStatement.with_strategy(fixed),
            FormatAdapter::PdfStatement
        );
        assert_eq!(
            FormatAdapter::for_file_name("a.csv").unwrap().with_strategy(fixed),
            FormatAdapter::DelimitedText(fixed)
        );
    }

    #[test]
    fn test_extract_file_is_pure_function_of_bytes() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(b"junk\nUTR,Amount\n412345678901,10.00\n").unwrap();
        let adapter = FormatAdapter::for_file_name("upload.csv").unwrap();
        let first = adapter.extract_file(f.path()).unwrap();
        let second = adapter.extract_file(f.path()).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }
}
