//! Canonical statement records produced by the ingest layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a bank-assigned unique transaction reference.
pub const UTR_LEN: usize = 12;

/// A canonical UTR: exactly twelve ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Utr(String);

impl Utr {
    /// Accepts only an already-canonical reference (no prefix, no padding).
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == UTR_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Utr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Utr {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Utr::parse(&value).ok_or_else(|| format!("not a 12-digit UTR: {value:?}"))
    }
}

impl From<Utr> for String {
    fn from(value: Utr) -> Self {
        value.0
    }
}

/// One credit line recovered from a statement.
///
/// Both fields are always present; rows that fail normalization never
/// become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(rename = "UTR_Number")]
    pub utr_number: Utr,
    #[serde(rename = "Credit_Amount", with = "rust_decimal::serde::float")]
    pub credit_amount: Decimal,
}

impl ExtractedRecord {
    pub fn new(utr_number: Utr, credit_amount: Decimal) -> Self {
        Self {
            utr_number,
            credit_amount,
        }
    }
}
