//! Legacy binary spreadsheet (.xls) statements.
//!
//! Only the first worksheet is read. Reference columns in this family are
//! often zero-padded (`0000412345678901`), and the table is followed by
//! summary rows that carry amounts but no transaction date.

use calamine::{Reader, Xls, open_workbook_from_rs};
use std::io::Cursor;
use utrsync_core::ExtractedRecord;

use crate::error::{IngestError, Result};
use crate::layout::{HeaderStrategy, SynonymPair, locate, pair};
use crate::parsers::collect_records;
use crate::parsers::workbook::sheet_rows;
use crate::types::RawRow;

pub const FORMAT: &str = "xls";

pub const CATALOG: &[SynonymPair] = &[
    pair("Chq./Ref.No.", "Deposit Amt."),
    pair("Narration", "Deposit Amt."),
    pair("Description", "Amount (INR)"),
    pair("Remarks", "Deposits"),
];

pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook: Xls<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(calamine::Error::Xls)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::EmptyWorkbook { format: FORMAT })?;
    let range = workbook.worksheet_range(&first).map_err(calamine::Error::Xls)?;
    Ok(sheet_rows(&range))
}

pub fn records_from_rows(rows: &[RawRow], strategy: HeaderStrategy) -> Result<Vec<ExtractedRecord>> {
    let slice = locate(rows, CATALOG, strategy, FORMAT)?;
    Ok(collect_records(rows, &slice, true))
}

pub fn extract(bytes: &[u8], strategy: HeaderStrategy) -> Result<Vec<ExtractedRecord>> {
    let rows = read_rows(bytes)?;
    records_from_rows(&rows, strategy)
}
