//! utrsync-ingest: statement layout detection, field normalization and
//! per-format parsers producing `(UTR, amount)` records.

pub mod error;
pub mod format;
pub mod layout;
pub mod normalize;
pub mod parsers;
pub mod types;

pub use error::IngestError;
pub use format::{ACCEPTED_EXTENSIONS, FormatAdapter};
pub use layout::{HeaderMap, HeaderStrategy, SynonymPair, TableSlice};
pub use normalize::{normalize_amount, normalize_utr};
pub use types::{Cell, RawRow};
