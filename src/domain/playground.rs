//! Playground records and the query-history audit model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::playground_id::PlaygroundId;
use super::query_result::QueryResult;

/// A named workspace under which queries are executed and history tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Playground {
    /// Unique identifier, generated at creation.
    pub id: PlaygroundId,
    /// Non-empty display name (stored trimmed).
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on rename; equals `created_at` at creation.
    pub updated_at: DateTime<Utc>,
}

impl Playground {
    /// Creates a fresh playground with `created_at == updated_at`.
    ///
    /// Name validation is the service layer's job; this constructor assumes
    /// a trimmed, non-empty name.
    #[must_use]
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: PlaygroundId::new(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Status column value for a successful execution.
pub const STATUS_SUCCESS: &str = "success";
/// Status column value for a failed execution.
pub const STATUS_ERROR: &str = "error";

/// Outcome of one execution attempt, as persisted in a history record.
///
/// Stored heterogeneously in a single `result` column keyed by `status`:
/// success rows hold a JSON-serialized [`QueryResult`], error rows hold the
/// engine's raw message text. This type is the tagged-union view of that
/// column; readers must branch on the variant, never on the blob itself.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The statement executed; payload is the normalized result.
    Success(QueryResult),
    /// The engine rejected the statement; payload is its message text.
    Failure(String),
}

impl QueryOutcome {
    /// The `status` column value for this variant.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => STATUS_SUCCESS,
            Self::Failure(_) => STATUS_ERROR,
        }
    }

    /// Serializes the variant into its stored `result` column form.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a successful result cannot be
    /// serialized.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Success(result) => serde_json::to_string(result),
            Self::Failure(message) => Ok(message.clone()),
        }
    }

    /// Reconstructs the variant from stored `status` and `result` columns.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a success payload does not parse
    /// as a [`QueryResult`].
    pub fn from_stored(status: &str, payload: String) -> Result<Self, serde_json::Error> {
        if status == STATUS_ERROR {
            Ok(Self::Failure(payload))
        } else {
            Ok(Self::Success(serde_json::from_str(&payload)?))
        }
    }
}

/// An immutable audit entry for one execution attempt.
///
/// Append-only: created on every attempt that reaches the engine, never
/// mutated, removed only by the playground-delete cascade.
#[derive(Debug, Clone)]
pub struct QueryHistoryRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Playground the attempt was executed under.
    pub playground_id: PlaygroundId,
    /// The SQL text exactly as submitted to the engine.
    pub query_text: String,
    /// Success or failure outcome.
    pub outcome: QueryOutcome,
    /// When the attempt was executed.
    pub executed_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_playground_has_equal_timestamps() {
        let pg = Playground::new("Demo".to_string());
        assert_eq!(pg.created_at, pg.updated_at);
        assert_eq!(pg.name, "Demo");
    }

    #[test]
    fn success_outcome_round_trips_through_storage_form() {
        let outcome = QueryOutcome::Success(QueryResult::statement_ack(5));
        assert_eq!(outcome.status(), STATUS_SUCCESS);
        let Ok(payload) = outcome.to_payload() else {
            panic!("payload serialization failed");
        };
        let restored = QueryOutcome::from_stored(STATUS_SUCCESS, payload)
            .ok()
            .unwrap_or_else(|| panic!("payload did not parse"));
        assert_eq!(restored, outcome);
    }

    #[test]
    fn failure_outcome_keeps_raw_message() {
        let outcome = QueryOutcome::Failure("near \"SELEC\": syntax error".to_string());
        assert_eq!(outcome.status(), STATUS_ERROR);
        let Ok(payload) = outcome.to_payload() else {
            panic!("payload serialization failed");
        };
        assert_eq!(payload, "near \"SELEC\": syntax error");
        let restored = QueryOutcome::from_stored(STATUS_ERROR, payload)
            .ok()
            .unwrap_or_else(|| panic!("restore failed"));
        assert_eq!(restored, outcome);
    }

    #[test]
    fn corrupt_success_payload_is_an_error() {
        let restored = QueryOutcome::from_stored(STATUS_SUCCESS, "not json".to_string());
        assert!(restored.is_err());
    }
}
