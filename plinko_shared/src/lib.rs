use chrono::{DateTime, Utc};
use plinko_core::{AuditReport, Decision, FairnessError, PegMap, PublishedRound, Verification};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub commit_hex: String,
    pub nonce: String,
    /// Only present for the operator; never shown to players before reveal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CombineResponse {
    pub combined_seed: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub drop_column: usize,
    pub bin_index: usize,
    pub payout_multiplier: f64,
    pub peg_map_hash: String,
    pub decisions: Vec<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peg_map: Option<PegMap>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: String,
    pub drop_column: usize,
    pub rows: Option<usize>,
}

impl VerifyRequest {
    /// Collects every problem with the request into one message.
    pub fn validate(&self) -> ApiResult<()> {
        let mut errors = Vec::new();
        if self.server_seed.trim().is_empty() {
            errors.push("serverSeed is required".to_string());
        }
        if self.client_seed.trim().is_empty() {
            errors.push("clientSeed is required".to_string());
        }
        if self.nonce.trim().is_empty() {
            errors.push("nonce is required".to_string());
        }
        let rows = self.rows.unwrap_or(plinko_core::DEFAULT_ROWS);
        if rows == 0 {
            errors.push("rows must be a positive number".to_string());
        } else if self.drop_column > rows {
            errors.push(format!("dropColumn must be between 0 and {rows}"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Invalid(errors.join(", ")))
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(flatten)]
    pub verification: Verification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditReport>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    pub round: PublishedRound,
    pub payout_cents: u64,
    pub revealed_at: DateTime<Utc>,
    pub audit: AuditReport,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl From<FairnessError> for ApiError {
    fn from(err: FairnessError) -> Self {
        // engine failures are all bad input, never transient
        ApiError::Invalid(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
