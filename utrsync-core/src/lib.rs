//! utrsync-core: statement records, platform deposit requests and exact matching

pub mod matching;
pub mod record;
pub mod request;

pub use matching::{Match, compute_matches};
pub use record::{ExtractedRecord, UTR_LEN, Utr};
pub use request::{PendingRequest, PlatformId};
