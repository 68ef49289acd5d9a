//! Per-format statement parsers.
//!
//! Each parser decodes its medium into rows (or text lines) and owns the
//! header catalog and slicing rules of the statements it accepts.

pub mod delimited;
pub mod legacy_sheet;
pub mod modern_sheet;
pub mod pdf_statement;
mod workbook;

use tracing::debug;
use utrsync_core::ExtractedRecord;

use crate::layout::{TableSlice, is_statement_date};
use crate::normalize::{amount_from_cell, utr_from_cell};
use crate::types::{Cell, RawRow};

/// Turn the data rows of a located table into records. Rows missing either
/// field are dropped; with `require_date`, so are rows whose date cell is not
/// a statement date (totals and footers).
pub(crate) fn collect_records(rows: &[RawRow], slice: &TableSlice, require_date: bool) -> Vec<ExtractedRecord> {
    let header = slice.header;
    let empty = Cell::Empty;
    let mut out = Vec::new();
    let mut dropped = 0usize;

    for row in rows.iter().skip(slice.data_start) {
        if require_date {
            if let Some(col) = header.date {
                if !is_statement_date(row.get(col).unwrap_or(&empty)) {
                    dropped += 1;
                    continue;
                }
            }
        }

        let utr = utr_from_cell(row.get(header.identifier).unwrap_or(&empty));
        let amount = amount_from_cell(row.get(header.amount).unwrap_or(&empty));
        match (utr, amount) {
            (Some(utr), Some(amount)) => out.push(ExtractedRecord::new(utr, amount)),
            _ => dropped += 1,
        }
    }

    debug!(kept = out.len(), dropped, "collected table records");
    out
}
