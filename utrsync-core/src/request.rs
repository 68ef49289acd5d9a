//! Deposit requests as reported by the payment platform.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform identifiers arrive as either JSON numbers or strings and are sent
/// back in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformId {
    Num(i64),
    Text(String),
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformId::Num(n) => write!(f, "{n}"),
            PlatformId::Text(s) => f.write_str(s),
        }
    }
}

/// A deposit awaiting approval. Fetched fresh on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: PlatformId,
    pub user_id: PlatformId,
    #[serde(default)]
    pub utr_number: String,
    /// Accepts a JSON number or a numeric string.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
}
