//! utrsync-reconcile: provider credentials, the deposit platform client and
//! the match-then-approve reconciler

pub mod error;
pub mod platform;
pub mod provider;
pub mod reconciler;

pub use error::{ApprovalError, ReconcileError};
pub use platform::{Approval, DEFAULT_BASE_URL, DepositPlatform, HttpPlatform};
pub use provider::{Credentials, ProviderProfile, ProviderTable};
pub use reconciler::{MatchOutcome, Preview, ReconcileReport, Reconciler};
