//! Field normalization: raw identifier and amount cells into canonical values.
//!
//! Both entry points return `None` instead of failing; a `None` on either
//! side drops the owning row.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use utrsync_core::{UTR_LEN, Utr};

use crate::types::Cell;

/// Optional single letter, then exactly twelve digits, as a whole token.
static UTR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]?(\d{12})\b").unwrap());

/// Longest glyphs first so "Rs." is not left as ".".
const CURRENCY_GLYPHS: &[&str] = &["\u{20b9}", "INR", "Rs.", "Rs", "$"];

/// Extract the canonical 12-digit UTR from a raw identifier cell.
///
/// A zero-padded reference (all digits, longer than a UTR, leading zero) has
/// its leading zero run stripped and must then be exactly a UTR. Any other
/// text goes through the token pattern.
pub fn normalize_utr(raw: &str) -> Option<Utr> {
    let raw = raw.trim();
    if is_zero_padded(raw) {
        return Utr::parse(raw.trim_start_matches('0'));
    }
    UTR_TOKEN
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Utr::parse(m.as_str()))
}

fn is_zero_padded(s: &str) -> bool {
    s.len() > UTR_LEN && s.starts_with('0') && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a raw amount into a positive decimal.
///
/// Strips currency glyphs, thousands separators and a trailing credit marker.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let mut s = raw.replace(',', "");
    for glyph in CURRENCY_GLYPHS {
        s = s.replace(glyph, "");
    }
    let s = strip_credit_marker(s.trim()).trim();
    if s.is_empty() {
        return None;
    }
    let value = Decimal::from_str(s).ok()?;
    (value > Decimal::ZERO).then_some(value)
}

fn strip_credit_marker(s: &str) -> &str {
    let s = s.strip_suffix('.').unwrap_or(s);
    match s.len().checked_sub(2).and_then(|at| s.get(at..).map(|tail| (at, tail))) {
        Some((at, tail)) if tail.eq_ignore_ascii_case("cr") => &s[..at],
        _ => s,
    }
}

pub fn utr_from_cell(cell: &Cell) -> Option<Utr> {
    match cell {
        Cell::Empty => None,
        other => normalize_utr(&other.to_text()),
    }
}

pub fn amount_from_cell(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) if !n.is_finite() || *n <= 0.0 => None,
        // Shortest round-trip text keeps 1500.1 from becoming 1500.0999...
        Cell::Number(n) => normalize_amount(&format!("{n}")),
        Cell::Text(s) => normalize_amount(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utr(s: &str) -> Option<String> {
        normalize_utr(s).map(|u| u.to_string())
    }

    #[test]
    fn test_canonical_utr_is_unchanged() {
        assert_eq!(utr("071234567890").as_deref(), Some("071234567890"));
        let once = normalize_utr("071234567890").unwrap();
        assert_eq!(normalize_utr(once.as_str()), Some(once));
    }

    #[test]
    fn test_letter_prefix_is_dropped() {
        assert_eq!(utr("N123456789012").as_deref(), Some("123456789012"));
    }

    #[test]
    fn test_utr_inside_narration() {
        assert_eq!(
            utr("UPI/412345678901/PAYMENT FROM PHONE/user@okaxis").as_deref(),
            Some("412345678901")
        );
        assert_eq!(utr("IMPS-P2A-312345678901-JOHN").as_deref(), Some("312345678901"));
    }

    #[test]
    fn test_utr_must_be_whole_token() {
        assert_eq!(utr("1234567890123"), None);
        assert_eq!(utr("UPI123456789012"), None);
        assert_eq!(utr("12345678901"), None);
    }

    #[test]
    fn test_zero_padded_reference() {
        assert_eq!(utr("0000412345678901").as_deref(), Some("412345678901"));
        // Stripping leaves too few digits; no second interpretation is tried.
        assert_eq!(utr("0000041234567890"), None);
    }

    #[test]
    fn test_amount_strips_formatting() {
        assert_eq!(normalize_amount("1,500.00"), Some(Decimal::new(150000, 2)));
        assert_eq!(normalize_amount(" \u{20b9}2,00,000.50 "), Some(Decimal::new(20000050, 2)));
        assert_eq!(normalize_amount("Rs. 750"), Some(Decimal::new(750, 0)));
        assert_eq!(normalize_amount("INR 99.9"), Some(Decimal::new(999, 1)));
        assert_eq!(normalize_amount("1,200.00 Cr"), Some(Decimal::new(120000, 2)));
        assert_eq!(normalize_amount("1200.00CR"), Some(Decimal::new(120000, 2)));
    }

    #[test]
    fn test_amount_rejects_non_values() {
        assert_eq!(normalize_amount("N/A"), None);
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("   "), None);
        assert_eq!(normalize_amount("0.00"), None);
        assert_eq!(normalize_amount("-15.00"), None);
        assert_eq!(normalize_amount("Cr"), None);
    }

    #[test]
    fn test_cells() {
        assert_eq!(
            utr_from_cell(&Cell::Number(412345678901.0)).map(|u| u.to_string()).as_deref(),
            Some("412345678901")
        );
        assert_eq!(amount_from_cell(&Cell::Number(1500.1)), Some(Decimal::new(15001, 1)));
        assert_eq!(amount_from_cell(&Cell::Number(0.0)), None);
        assert_eq!(amount_from_cell(&Cell::Empty), None);
        assert_eq!(amount_from_cell(&Cell::Text("1,500.00".into())), Some(Decimal::new(1500, 0)));
    }
}
