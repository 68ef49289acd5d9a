//! PDF statements, from extracted text. No OCR: scanned statements yield no text.
//!
//! Two readers, chosen by looking for the `Date Particulars ... Deposit`
//! header line:
//!
//! * structured: records are line triplets. Lines i and i+1 carry the
//!   reference; line i+2 is a digit blob whose tail is the credit amount.
//! * fallback: a line with a UTR is held as pending and paired with a
//!   currency amount found exactly two lines later.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;
use utrsync_core::{ExtractedRecord, Utr};

use crate::error::{IngestError, Result};
use crate::normalize::{normalize_amount, normalize_utr};

pub const FORMAT: &str = "pdf";

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdate\b.*\bparticulars\b.*\bdeposits?\b").unwrap());

static CURRENCY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\x{20b9}|Rs\.?|INR)?\s*(\d{1,3}(?:,\d{2,3})+(?:\.\d{1,2})?|\d+\.\d{2})").unwrap()
});

/// Prefix widths tried, in order, when cutting the amount off a digit blob.
/// Tuned to one provider's layout, where the blob starts with a value date
/// and a serial glued to the amount.
const BLOB_PREFIX_WIDTHS: [usize; 2] = [7, 6];

pub fn extract(bytes: &[u8]) -> Result<Vec<ExtractedRecord>> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))?;
    Ok(records_from_text(&text))
}

pub fn records_from_text(text: &str) -> Vec<ExtractedRecord> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    match find_header(&lines) {
        Some(idx) => {
            let recs = structured(&lines[idx + 1..]);
            debug!(header_line = idx, records = recs.len(), "pdf structured mode");
            recs
        }
        None => {
            let recs = unstructured(&lines);
            debug!(records = recs.len(), "pdf fallback mode");
            recs
        }
    }
}

fn collapse(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

pub fn find_header(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| HEADER.is_match(&collapse(line)))
}

/// The reference may be split across the two lines, so the glued form is
/// tried before the spaced one.
fn triplet_utr(first: &str, second: &str) -> Option<Utr> {
    normalize_utr(&format!("{first}{second}")).or_else(|| normalize_utr(&format!("{first} {second}")))
}

/// Cut a fixed-width prefix off the blob; the first width giving a
/// positive amount wins.
pub fn recover_blob_amount(blob: &str) -> Option<Decimal> {
    let blob: String = blob.split_whitespace().collect();
    BLOB_PREFIX_WIDTHS
        .iter()
        .find_map(|&width| normalize_amount(&blob.chars().skip(width).collect::<String>()))
}

fn structured(lines: &[&str]) -> Vec<ExtractedRecord> {
    let mut out = Vec::new();
    let mut i = 0;
    while i + 2 < lines.len() {
        let utr = triplet_utr(lines[i], lines[i + 1]);
        let amount = recover_blob_amount(lines[i + 2]);
        match (utr, amount) {
            (Some(utr), Some(amount)) => {
                out.push(ExtractedRecord::new(utr, amount));
                i += 3;
            }
            _ => i += 1,
        }
    }
    out
}

/// First currency amount on the line that is not the head of a longer
/// number or date.
pub fn find_currency_amount(line: &str) -> Option<Decimal> {
    CURRENCY_AMOUNT.captures_iter(line).find_map(|caps| {
        let m = caps.get(1)?;
        let next = line[m.end()..].chars().next();
        if next.is_some_and(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }
        normalize_amount(m.as_str())
    })
}

fn unstructured(lines: &[&str]) -> Vec<ExtractedRecord> {
    let mut out = Vec::new();
    let mut pending: Option<(Utr, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some((utr, at)) = pending.take() {
            match (i == at + 2).then(|| find_currency_amount(line)).flatten() {
                Some(amount) => out.push(ExtractedRecord::new(utr, amount)),
                None => pending = Some((utr, at)),
            }
        }
        if let Some(utr) = normalize_utr(line) {
            pending = Some((utr, i));
        }
    }
    out
}
