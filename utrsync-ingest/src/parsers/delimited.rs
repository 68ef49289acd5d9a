//! Delimited-text (CSV) statements.
//!
//! Bank CSV exports carry a free-form preamble (account holder, address,
//! period) before the transaction table; its height varies per export.
//!
//!   Account Name : ...
//!   Sr.No.,Date,Type, Description, Debit ,Credit ,Balance
//!   1,01/04/24,Transfer Credit,UPI/412345678901/..., ,"1,500.00","9,200.00"

use utrsync_core::ExtractedRecord;

use crate::error::Result;
use crate::layout::{HeaderStrategy, SynonymPair, locate, pair};
use crate::parsers::collect_records;
use crate::types::{Cell, RawRow};

pub const FORMAT: &str = "csv";

pub const CATALOG: &[SynonymPair] = &[
    pair("Cheque No.", "Credit"),
    pair("UTR", "Amount"),
    pair("Utr", "Amount"),
    pair("Description", "Amount (INR)"),
    pair("Description", "Credit"),
    pair("Description", "Amount"),
    pair("Narration", "Deposit Amt."),
];

/// Decode CSV bytes into raw rows. Ragged rows are kept; undecodable bytes
/// are replaced rather than failing the file.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| Cell::text(String::from_utf8_lossy(field).into_owned()))
                .collect(),
        );
    }
    Ok(rows)
}

pub fn records_from_rows(rows: &[RawRow], strategy: HeaderStrategy) -> Result<Vec<ExtractedRecord>> {
    let slice = locate(rows, CATALOG, strategy, FORMAT)?;
    Ok(collect_records(rows, &slice, false))
}

/// Drop the first `count` physical lines, blank ones included. The csv
/// reader skips blank lines, so a fixed offset must be applied before it.
pub fn skip_physical_lines(bytes: &[u8], count: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..count {
        match rest.iter().position(|&b| b == b'\n') {
            Some(at) => rest = &rest[at + 1..],
            None => return &[],
        }
    }
    rest
}

pub fn extract(bytes: &[u8], strategy: HeaderStrategy) -> Result<Vec<ExtractedRecord>> {
    match strategy {
        HeaderStrategy::Catalog => records_from_rows(&read_rows(bytes)?, strategy),
        HeaderStrategy::Fixed { skip } => {
            let rows = read_rows(skip_physical_lines(bytes, skip))?;
            records_from_rows(&rows, HeaderStrategy::Fixed { skip: 0 })
        }
    }
}
