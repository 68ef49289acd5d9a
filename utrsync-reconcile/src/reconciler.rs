//! Match-then-approve run against the platform.
//!
//! Credential, fetch and matching are strictly sequential. Approvals fan out
//! together and are awaited as a batch; each one succeeds or fails alone.

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};
use utrsync_core::{ExtractedRecord, Match, compute_matches};

use crate::error::{ApprovalError, ReconcileError};
use crate::platform::{Approval, DepositPlatform};
use crate::provider::ProviderTable;

/// Result of one approval call.
#[derive(Debug)]
pub struct MatchOutcome {
    pub matched: Match,
    pub result: Result<(), ApprovalError>,
}

impl MatchOutcome {
    pub fn is_approved(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct ReconcileReport {
    pub provider: String,
    pub pending: usize,
    pub extracted: usize,
    pub outcomes: Vec<MatchOutcome>,
}

impl ReconcileReport {
    pub fn approved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_approved()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &MatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_approved())
    }

    pub fn summary(&self) -> String {
        let failed = self.outcomes.len() - self.approved();
        let mut s = format!(
            "Approved {} of {} matched deposits for {} ({} pending, {} statement records)",
            self.approved(),
            self.outcomes.len(),
            self.provider,
            self.pending,
            self.extracted
        );
        if failed > 0 {
            s.push_str(&format!("; {failed} approval(s) failed"));
        }
        s
    }
}

/// Matches found without approving anything.
#[derive(Debug, Serialize)]
pub struct Preview {
    pub provider: String,
    pub pending: usize,
    pub matches: Vec<Match>,
}

pub struct Reconciler<P> {
    platform: P,
    providers: ProviderTable,
}

impl<P: DepositPlatform> Reconciler<P> {
    pub fn new(platform: P, providers: ProviderTable) -> Self {
        Self { platform, providers }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Resolve, fetch and match; stop before any approval.
    pub async fn preview(&self, records: &[ExtractedRecord], tag: &str) -> Result<Preview, ReconcileError> {
        let creds = self.providers.resolve(tag)?;
        let pending = self.platform.fetch_pending(&creds.token).await?;
        let matches = compute_matches(&pending, records);
        info!(provider = %creds.tag, pending = pending.len(), matches = matches.len(), "preview");
        Ok(Preview {
            provider: creds.tag,
            pending: pending.len(),
            matches,
        })
    }

    /// Approve every pending request backed by a statement record.
    ///
    /// Errors only for failures before matching; per-approval failures are
    /// logged and carried in the report.
    pub async fn run(&self, records: &[ExtractedRecord], tag: &str) -> Result<ReconcileReport, ReconcileError> {
        let creds = self.providers.resolve(tag)?;
        let pending = self.platform.fetch_pending(&creds.token).await?;
        let matches = compute_matches(&pending, records);
        info!(
            provider = %creds.tag,
            pending = pending.len(),
            extracted = records.len(),
            matches = matches.len(),
            "matched statement against pending deposits"
        );

        let platform = &self.platform;
        let token = creds.token.as_str();
        let calls = matches.iter().map(|m| {
            let approval = Approval::for_match(m, &creds.remark);
            async move { platform.approve(token, &approval).await }
        });
        let results = join_all(calls).await;

        let outcomes: Vec<MatchOutcome> = matches
            .into_iter()
            .zip(results)
            .map(|(matched, result)| {
                match &result {
                    Ok(()) => info!(
                        utr = %matched.record.utr_number,
                        amount = %matched.request.amount,
                        request = %matched.request.id,
                        "approved deposit"
                    ),
                    Err(e) => warn!(
                        utr = %matched.record.utr_number,
                        amount = %matched.request.amount,
                        request = %matched.request.id,
                        error = %e,
                        "deposit approval failed"
                    ),
                }
                MatchOutcome { matched, result }
            })
            .collect();

        Ok(ReconcileReport {
            provider: creds.tag,
            pending: pending.len(),
            extracted: records.len(),
            outcomes,
        })
    }
}
