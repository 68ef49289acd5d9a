//! Modern spreadsheet (.xlsx) statements, including PDF-to-sheet conversions.
//!
//! The first worksheet holds the main table and is located by catalog.
//! Converters emit continuation pages as extra sheets named `Table 2`,
//! `Table 3`, ...; those have no header and a fixed shape: reference in
//! column B, amount in column D, data from the second row.

use calamine::{Reader, Xlsx, open_workbook_from_rs};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;
use tracing::debug;
use utrsync_core::ExtractedRecord;

use crate::error::{IngestError, Result};
use crate::layout::{HeaderMap, HeaderStrategy, SynonymPair, TableSlice, locate, pair};
use crate::parsers::collect_records;
use crate::parsers::workbook::sheet_rows;
use crate::types::RawRow;

pub const FORMAT: &str = "xlsx";

pub const CATALOG: &[SynonymPair] = &[
    pair("Transaction Remarks", "Deposit Amt (INR)"),
    pair("Description", "Amount"),
    pair("Remarks", "Deposits"),
    pair("RRN Number", "Transaction Amt"),
    pair("Description", "Amount (INR)"),
];

static TABLE_SHEET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*table\s*\d+\s*$").unwrap());

/// Column B / column D, second row onward.
const TABLE_SLICE: TableSlice = TableSlice {
    header: HeaderMap {
        identifier: 1,
        amount: 3,
        date: None,
    },
    data_start: 1,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

pub fn is_table_sheet(name: &str) -> bool {
    TABLE_SHEET.is_match(name)
}

/// Read the primary sheet and every supplementary `Table N` sheet, in
/// workbook order. Other sheets are never decoded.
pub fn read_sheets(bytes: &[u8]) -> Result<Vec<Sheet>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(calamine::Error::Xlsx)?;
    let names = workbook.sheet_names();

    let mut sheets = Vec::new();
    for (idx, name) in names.into_iter().enumerate() {
        if idx > 0 && !is_table_sheet(&name) {
            continue;
        }
        let range = workbook.worksheet_range(&name).map_err(calamine::Error::Xlsx)?;
        sheets.push(Sheet {
            rows: sheet_rows(&range),
            name,
        });
    }
    Ok(sheets)
}

pub fn records_from_sheets(sheets: &[Sheet], strategy: HeaderStrategy) -> Result<Vec<ExtractedRecord>> {
    let (primary, rest) = sheets
        .split_first()
        .ok_or(IngestError::EmptyWorkbook { format: FORMAT })?;

    let slice = locate(&primary.rows, CATALOG, strategy, FORMAT)?;
    let mut out = collect_records(&primary.rows, &slice, false);

    for sheet in rest.iter().filter(|s| is_table_sheet(&s.name)) {
        let before = out.len();
        out.extend(collect_records(&sheet.rows, &TABLE_SLICE, false));
        debug!(sheet = %sheet.name, records = out.len() - before, "read supplementary table");
    }
    Ok(out)
}

pub fn extract(bytes: &[u8], strategy: HeaderStrategy) -> Result<Vec<ExtractedRecord>> {
    let sheets = read_sheets(bytes)?;
    records_from_sheets(&sheets, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use rust_decimal::Decimal;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| Cell::text(*c)).collect()
    }

    fn sheet(name: &str, rows: Vec<RawRow>) -> Sheet {
        Sheet {
            name: name.to_string(),
            rows,
        }
    }

    fn primary() -> Sheet {
        sheet(
            "Sheet1",
            vec![
                row(&["ICICI Bank"]),
                row(&["S No.", "Value Date", "Transaction Date", "Transaction Remarks", "Withdrawal Amt (INR)", "Deposit Amt (INR)"]),
                row(&["1", "01/04/2024", "01/04/2024", "UPI/412345678901/Payment from Bob/bob@ybl", "0.00", "1,000.00"]),
                row(&["2", "02/04/2024", "02/04/2024", "NEFT-OUT", "300.00", "0.00"]),
            ],
        )
    }

    #[test]
    fn test_primary_sheet_only() {
        let recs = records_from_sheets(&[primary()], HeaderStrategy::Catalog).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].utr_number.as_str(), "412345678901");
        assert_eq!(recs[0].credit_amount, Decimal::new(1000, 0));
    }

    #[test]
    fn test_table_sheets_accumulate() {
        let sheets = vec![
            primary(),
            sheet(
                "Table 2",
                vec![
                    row(&["Date", "Ref", "Narration", "Credit"]),
                    row(&["03/04/2024", "512345678902", "IMPS", "250.50"]),
                ],
            ),
            sheet("Notes", vec![row(&["x", "612345678903", "y", "99.00"])]),
            sheet(
                "table 3",
                vec![
                    row(&["03/04/2024", "712345678904", "IMPS", "1.00"]),
                    row(&["04/04/2024", "N712345678905", "UPI", "2,000.00"]),
                ],
            ),
        ];
        let recs = records_from_sheets(&sheets, HeaderStrategy::Catalog).unwrap();
        let utrs: Vec<_> = recs.iter().map(|r| r.utr_number.as_str()).collect();
        // "table 3" starts at its second row, so 712345678904 is skipped.
        assert_eq!(utrs, vec!["412345678901", "512345678902", "712345678905"]);
        assert_eq!(recs[1].credit_amount, Decimal::new(25050, 2));
    }

    #[test]
    fn test_table_sheet_names() {
        assert!(is_table_sheet("Table 1"));
        assert!(is_table_sheet("TABLE12"));
        assert!(!is_table_sheet("Table of contents"));
        assert!(!is_table_sheet("Summary"));
    }

    #[test]
    fn test_primary_without_header_is_fatal() {
        let sheets = vec![
            sheet("Sheet1", vec![row(&["nothing"])]),
            sheet("Table 2", vec![row(&["h"]), row(&["", "512345678902", "", "10"])]),
        ];
        assert!(matches!(
            records_from_sheets(&sheets, HeaderStrategy::Catalog),
            Err(IngestError::HeaderNotFound { format: "xlsx" })
        ));
    }

    #[test]
    fn test_empty_workbook() {
        assert!(matches!(
            records_from_sheets(&[], HeaderStrategy::Catalog),
            Err(IngestError::EmptyWorkbook { .. })
        ));
    }
}
