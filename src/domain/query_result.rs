//! Normalized shape of a successful query execution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement row text for statements that return no rows.
///
/// SQLite does not report affected-row counts through the sandbox's
/// execution path, so write/DDL statements get this synthesized result.
pub const STATEMENT_ACK_MESSAGE: &str = "Query executed successfully";

/// Normalized result of one executed statement.
///
/// Ephemeral: never stored as a row of its own. On success it is serialized
/// into the history record's result payload using the exact wire keys below
/// (`rowCount`, `executionTime`), which is also the HTTP response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryResult {
    /// Ordered, distinct column names. Empty for a zero-row result set:
    /// an empty result cannot report its column names (accepted asymmetry).
    pub columns: Vec<String>,
    /// One JSON object per row, keyed by column name.
    pub rows: Vec<serde_json::Value>,
    /// Number of rows returned.
    #[serde(rename = "rowCount")]
    pub row_count: usize,
    /// Elapsed wall time of the execution, in milliseconds.
    #[serde(rename = "executionTime")]
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Builds a result from fetched rows.
    #[must_use]
    pub fn from_rows(columns: Vec<String>, rows: Vec<serde_json::Value>, elapsed_ms: u64) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time_ms: elapsed_ms,
        }
    }

    /// Synthesized single-row acknowledgement for write/DDL statements.
    #[must_use]
    pub fn statement_ack(elapsed_ms: u64) -> Self {
        Self {
            columns: vec!["message".to_string()],
            rows: vec![serde_json::json!({ "message": STATEMENT_ACK_MESSAGE })],
            row_count: 1,
            execution_time_ms: elapsed_ms,
        }
    }
}
