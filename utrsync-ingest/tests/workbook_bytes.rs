//! Decoding real workbook bytes. The fixture's primary sheet has its used
//! range at C2:D4, a `Notes` sheet that must be ignored, and a `Table 2`
//! sheet whose used range starts in column B.

use rust_decimal::Decimal;
use utrsync_ingest::parsers::modern_sheet;
use utrsync_ingest::{Cell, FormatAdapter, HeaderStrategy};

const STATEMENT: &[u8] = include_bytes!("fixtures/statement_with_tables.xlsx");

#[test]
fn test_sheets_keep_absolute_coordinates() {
    let sheets = modern_sheet::read_sheets(STATEMENT).unwrap();
    let names: Vec<_> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Statement", "Table 2"]);

    let primary = &sheets[0].rows;
    assert!(primary[0].is_empty());
    assert_eq!(primary[1][0], Cell::Empty);
    assert_eq!(primary[1][2], Cell::Text("Description".to_string()));
    assert_eq!(primary[2][3], Cell::Number(1500.5));

    let table = &sheets[1].rows;
    assert_eq!(table[1][0], Cell::Empty);
    assert_eq!(table[1][1], Cell::Text("612345678902".to_string()));
}

#[test]
fn test_extract_primary_then_table_sheets() {
    let adapter = FormatAdapter::for_file_name("april.xlsx").unwrap();
    let recs = adapter.extract(STATEMENT).unwrap();

    let got: Vec<_> = recs
        .iter()
        .map(|r| (r.utr_number.as_str().to_string(), r.credit_amount))
        .collect();
    assert_eq!(
        got,
        vec![
            ("412345678901".to_string(), Decimal::new(15005, 1)),
            ("612345678902".to_string(), Decimal::new(250, 0)),
            ("712345678903".to_string(), Decimal::new(1000, 0)),
        ]
    );
}

#[test]
fn test_fixed_header_row_in_workbook() {
    let adapter = FormatAdapter::for_file_name("april.xlsx")
        .unwrap()
        .with_strategy(HeaderStrategy::Fixed { skip: 1 });
    assert_eq!(adapter.extract(STATEMENT).unwrap().len(), 3);

    let wrong = FormatAdapter::for_file_name("april.xlsx")
        .unwrap()
        .with_strategy(HeaderStrategy::Fixed { skip: 0 });
    assert!(wrong.extract(STATEMENT).is_err());
}
