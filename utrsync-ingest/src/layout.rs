//! Layout detection: find the header row of a transaction table inside
//! surrounding statement noise and map its columns to roles.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::{Cell, RawRow};

/// Header names that together mark a transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynonymPair {
    pub identifier: &'static str,
    pub amount: &'static str,
}

pub const fn pair(identifier: &'static str, amount: &'static str) -> SynonymPair {
    SynonymPair { identifier, amount }
}

pub const DATE_SYNONYMS: &[&str] = &["Date", "Txn Date", "Value Date", "Transaction Date", "Tran Date"];

/// Column index per role, taken from the detected header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMap {
    pub identifier: usize,
    pub amount: usize,
    pub date: Option<usize>,
}

/// How the header row is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStrategy {
    /// Scan top to bottom for the first row naming a catalog pair.
    #[default]
    Catalog,
    /// Skip `skip` rows; the next row is the header, data follows it.
    Fixed { skip: usize },
}

impl HeaderStrategy {
    pub fn from_skip_lines(skip: Option<usize>) -> Self {
        skip.map_or(HeaderStrategy::Catalog, |skip| HeaderStrategy::Fixed { skip })
    }
}

/// Where the records of one table live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSlice {
    pub header: HeaderMap,
    pub data_start: usize,
}

fn names(cell: &Cell, name: &str) -> bool {
    cell.as_str()
        .is_some_and(|text| text.trim().eq_ignore_ascii_case(name))
}

fn position(row: &RawRow, name: &str) -> Option<usize> {
    row.iter().position(|cell| names(cell, name))
}

/// Map columns of `row` if it names both sides of any catalog pair.
/// Pairs are tried in catalog order; partial matches do not count.
pub fn header_map(row: &RawRow, catalog: &[SynonymPair]) -> Option<HeaderMap> {
    catalog.iter().find_map(|p| {
        let identifier = position(row, p.identifier)?;
        let amount = position(row, p.amount)?;
        (identifier != amount).then(|| HeaderMap {
            identifier,
            amount,
            date: DATE_SYNONYMS.iter().find_map(|d| position(row, d)),
        })
    })
}

/// Index of the first row that qualifies as a header.
pub fn detect(rows: &[RawRow], catalog: &[SynonymPair]) -> Option<usize> {
    rows.iter().position(|row| header_map(row, catalog).is_some())
}

/// Resolve the table region for `rows`, failing fast when no header exists.
pub fn locate(
    rows: &[RawRow],
    catalog: &[SynonymPair],
    strategy: HeaderStrategy,
    format: &'static str,
) -> Result<TableSlice> {
    let found = match strategy {
        HeaderStrategy::Catalog => detect(rows, catalog)
            .and_then(|idx| header_map(&rows[idx], catalog).map(|header| (idx, header))),
        HeaderStrategy::Fixed { skip } => rows
            .get(skip)
            .and_then(|row| header_map(row, catalog))
            .map(|header| (skip, header)),
    };

    let (idx, header) = found.ok_or(IngestError::HeaderNotFound { format })?;
    debug!(format, header_row = idx, ?header, ?strategy, "located transaction table");
    Ok(TableSlice {
        header,
        data_start: idx + 1,
    })
}

const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d-%m-%y", "%d-%b-%Y", "%d %b %Y"];

/// True when a date cell holds a statement date. Numeric cells are
/// spreadsheet date serials.
pub fn is_statement_date(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::Number(n) => *n > 0.0,
        Cell::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &[SynonymPair] = &[pair("UTR", "Amount"), pair("Cheque No.", "Credit")];

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| Cell::text(*c)).collect()
    }

    #[test]
    fn test_detect_first_qualifying_row() {
        let rows = vec![
            row(&["Account statement"]),
            row(&["Date", "UTR", "Amount"]),
            row(&["01/02/24", "412345678901", "10.00"]),
            row(&["Cheque No.", "Credit"]),
        ];
        assert_eq!(detect(&rows, CATALOG), Some(1));
    }

    #[test]
    fn test_partial_match_does_not_qualify() {
        let rows = vec![
            row(&["UTR", "Narration"]),
            row(&["Amount", "Balance"]),
            row(&["Cheque No.", "Description", "Credit"]),
        ];
        assert_eq!(detect(&rows, CATALOG), Some(2));
    }

    #[test]
    fn test_header_names_are_whole_cells() {
        let rows = vec![row(&["UTR Ref", "Amount Due"])];
        assert_eq!(detect(&rows, CATALOG), None);
    }

    #[test]
    fn test_header_names_ignore_case_and_padding() {
        let map = header_map(&row(&[" Date", "Utr ", "AMOUNT"]), CATALOG).unwrap();
        assert_eq!(map, HeaderMap { identifier: 1, amount: 2, date: Some(0) });
    }

    #[test]
    fn test_locate_not_found_is_error() {
        let rows = vec![row(&["nothing", "here"])];
        let err = locate(&rows, CATALOG, HeaderStrategy::Catalog, "csv").unwrap_err();
        assert!(matches!(err, IngestError::HeaderNotFound { format: "csv" }));
    }

    #[test]
    fn test_fixed_offset_overrides_detection() {
        let rows = vec![
            row(&["UTR", "Amount"]),
            row(&["junk"]),
            row(&["Cheque No.", "Credit"]),
            row(&["412345678901", "5.00"]),
        ];
        let slice = locate(&rows, CATALOG, HeaderStrategy::Fixed { skip: 2 }, "csv").unwrap();
        assert_eq!(slice.data_start, 3);
        assert_eq!(slice.header.identifier, 0);

        let err = locate(&rows, CATALOG, HeaderStrategy::Fixed { skip: 1 }, "csv");
        assert!(err.is_err());
    }

    #[test]
    fn test_statement_dates() {
        assert!(is_statement_date(&Cell::text("05/03/24")));
        assert!(is_statement_date(&Cell::text("05/03/2024")));
        assert!(is_statement_date(&Cell::Number(45356.0)));
        assert!(!is_statement_date(&Cell::text("Opening Balance")));
        assert!(!is_statement_date(&Cell::Empty));
    }
}
