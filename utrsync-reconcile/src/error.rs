//! Reconciliation failures.
//!
//! [`ReconcileError`] aborts a run before any approval is issued.
//! [`ApprovalError`] belongs to a single match and never stops its siblings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Unknown provider '{tag}' (configured: {known})")]
    UnknownProvider { tag: String, known: String },

    #[error("No bearer token configured for provider '{tag}'")]
    MissingCredential { tag: String },

    #[error("Fetching pending deposits failed with HTTP {status}")]
    FetchStatus { status: u16 },

    #[error("Pending deposits response is malformed: {reason}")]
    MalformedResponse { reason: String },

    #[error("Fetching pending deposits failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("approval failed with HTTP {status}")]
    Status { status: u16 },

    #[error("approval rejected by platform (status {status})")]
    Rejected { status: String },

    #[error("approval response is malformed: {reason}")]
    MalformedResponse { reason: String },

    #[error("approval request failed: {0}")]
    Http(#[from] reqwest::Error),
}
