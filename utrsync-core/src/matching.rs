//! Exact `(UTR, amount)` pairing between pending requests and statement records.

use serde::Serialize;

use crate::record::ExtractedRecord;
use crate::request::PendingRequest;

/// A pending request paired with the statement record that proves it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub request: PendingRequest,
    pub record: ExtractedRecord,
}

impl Match {
    fn qualifies(request: &PendingRequest, record: &ExtractedRecord) -> bool {
        request.utr_number == record.utr_number.as_str() && request.amount == record.credit_amount
    }
}

/// Pair requests with records.
///
/// Requests are visited in platform order. A request matches when any record
/// has an equal UTR and a numerically equal amount; the first such record in
/// statement order is the one reported. Records are not consumed, so one
/// record may back several requests, but a request appears at most once.
pub fn compute_matches(requests: &[PendingRequest], records: &[ExtractedRecord]) -> Vec<Match> {
    requests
        .iter()
        .filter_map(|request| {
            records
                .iter()
                .find(|rec| Match::qualifies(request, rec))
                .map(|rec| Match {
                    request: request.clone(),
                    record: rec.clone(),
                })
        })
        .collect()
}
