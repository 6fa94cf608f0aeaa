//! Query execution and history DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{PlaygroundId, QueryHistoryRecord};
use crate::error::GatewayError;
use crate::service::playground_service::HISTORY_LIMIT;

/// Request body for `POST /playgrounds/{id}/execute`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecuteQueryRequest {
    /// Raw SQL text; must be non-empty after trimming.
    pub query: String,
}

/// Query parameters for `GET /playgrounds/{id}/queries`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Maximum records to return (1–50). Defaults to 50.
    pub limit: Option<u32>,
}

impl HistoryParams {
    /// Clamps `limit` into the allowed `1..=50` range when present.
    #[must_use]
    pub fn clamped(&self) -> Option<u32> {
        self.limit.map(|l| l.clamp(1, HISTORY_LIMIT))
    }
}

/// One history entry as returned by `GET /playgrounds/{id}/queries`.
///
/// The `result` field is the stored payload blob: serialized result JSON
/// for successes, the raw engine message for failures. Callers branch on
/// `status` before interpreting it.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryHistoryDto {
    /// History record identifier.
    pub id: Uuid,
    /// Owning playground.
    pub playground_id: PlaygroundId,
    /// SQL text as submitted.
    pub query: String,
    /// Serialized outcome payload (see type docs).
    pub result: String,
    /// `"success"` or `"error"`.
    pub status: String,
    /// When the attempt was executed.
    pub executed_at: DateTime<Utc>,
}

impl TryFrom<QueryHistoryRecord> for QueryHistoryDto {
    type Error = GatewayError;

    fn try_from(record: QueryHistoryRecord) -> Result<Self, Self::Error> {
        let status = record.outcome.status().to_string();
        let result = record
            .outcome
            .to_payload()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;
        Ok(Self {
            id: record.id,
            playground_id: record.playground_id,
            query: record.query_text,
            result,
            status,
            executed_at: record.executed_at,
        })
    }
}
