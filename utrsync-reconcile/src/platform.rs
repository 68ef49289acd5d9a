//! The payment platform's deposit API.

use reqwest::header::AUTHORIZATION;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};
use utrsync_core::{Match, PendingRequest, PlatformId};

use crate::error::{ApprovalError, ReconcileError};

pub const DEFAULT_BASE_URL: &str = "https://adminapi.bestlive.io";
pub const PENDING_PATH: &str = "/api/bank-account/request";
pub const APPROVE_PATH: &str = "/api/app-user/action/deposit-balance";

/// Body of an approval call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Approval {
    pub uid: PlatformId,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub balance: Decimal,
    pub withdraw_req_id: PlatformId,
    pub remark: String,
}

impl Approval {
    /// The remark comes from the provider, never from the match.
    pub fn for_match(m: &Match, remark: &str) -> Self {
        Self {
            uid: m.request.user_id.clone(),
            balance: m.request.amount,
            withdraw_req_id: m.request.id.clone(),
            remark: remark.to_string(),
        }
    }
}

/// Outstanding deposit-request query; the platform expects these exact keys.
#[derive(Debug, Serialize)]
struct PendingQuery {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "nType")]
    n_type: &'static str,
    start_date: &'static str,
    end_date: &'static str,
    #[serde(rename = "isFirst")]
    is_first: u8,
}

impl PendingQuery {
    fn deposits() -> Self {
        Self {
            kind: "",
            n_type: "deposit",
            start_date: "",
            end_date: "",
            is_first: 1,
        }
    }
}

pub trait DepositPlatform {
    fn fetch_pending(&self, token: &str) -> impl Future<Output = Result<Vec<PendingRequest>, ReconcileError>> + Send;

    fn approve(&self, token: &str, approval: &Approval) -> impl Future<Output = Result<(), ApprovalError>> + Send;
}

/// Read the `data` array of a fetch response. Entries that do not parse as
/// deposit requests are skipped; they could never match.
pub fn parse_pending(body: &Value) -> Result<Vec<PendingRequest>, ReconcileError> {
    let data = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ReconcileError::MalformedResponse {
            reason: "no data array present".to_string(),
        })?;

    let mut out = Vec::with_capacity(data.len());
    for entry in data {
        match serde_json::from_value::<PendingRequest>(entry.clone()) {
            Ok(req) => out.push(req),
            Err(e) => warn!(error = %e, "skipping unreadable pending request"),
        }
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct ApprovalAck {
    status: Option<Value>,
}

/// An approval counts only when the body reports `status == 1`, as an integer
/// or a float.
pub fn check_ack(body: &Value) -> Result<(), ApprovalError> {
    let ack: ApprovalAck = serde_json::from_value(body.clone()).map_err(|e| ApprovalError::MalformedResponse {
        reason: e.to_string(),
    })?;
    match ack.status {
        Some(ref s) if s.as_f64() == Some(1.0) => Ok(()),
        Some(s) => Err(ApprovalError::Rejected { status: s.to_string() }),
        None => Err(ApprovalError::Rejected {
            status: "missing".to_string(),
        }),
    }
}

/// reqwest-backed client. No retries; no timeout beyond the client's own.
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlatform {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl DepositPlatform for HttpPlatform {
    async fn fetch_pending(&self, token: &str) -> Result<Vec<PendingRequest>, ReconcileError> {
        let resp = self
            .client
            .post(self.url(PENDING_PATH))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(&PendingQuery::deposits())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReconcileError::FetchStatus {
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await.map_err(|e| ReconcileError::MalformedResponse {
            reason: e.to_string(),
        })?;
        let pending = parse_pending(&body)?;
        debug!(count = pending.len(), "fetched pending deposits");
        Ok(pending)
    }

    async fn approve(&self, token: &str, approval: &Approval) -> Result<(), ApprovalError> {
        let resp = self
            .client
            .post(self.url(APPROVE_PATH))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(approval)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApprovalError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = resp.json().await.map_err(|e| ApprovalError::MalformedResponse {
            reason: e.to_string(),
        })?;
        check_ack(&body)
    }
}
