use calamine::{Data, Range};

use crate::types::{Cell, RawRow};

fn cell_from(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
    }
}

/// Rows of a worksheet in absolute sheet coordinates: a used range that
/// starts at C4 still yields column C at index 2 and row 4 at index 3.
pub(crate) fn sheet_rows(range: &Range<Data>) -> Vec<RawRow> {
    let Some((row0, col0)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<RawRow> = (0..row0).map(|_| Vec::new()).collect();
    for data_row in range.rows() {
        let mut row: RawRow = vec![Cell::Empty; col0 as usize];
        row.extend(data_row.iter().map(cell_from));
        rows.push(row);
    }
    rows
}
