//! Query executor: runs arbitrary SQL against the sandbox and audits
//! every attempt.

use std::time::Instant;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use uuid::Uuid;

use crate::domain::{PlaygroundId, QueryHistoryRecord, QueryOutcome, QueryResult};
use crate::error::GatewayError;
use crate::persistence::{MetadataStore, SandboxDataset};
use crate::service::PlaygroundService;

/// Executes arbitrary SQL text on behalf of one playground.
///
/// Contract: a submission that passes the precondition checks (non-empty
/// text, existing playground) produces exactly one history record whether
/// the engine accepts or rejects it. An engine rejection still propagates to
/// the caller after the audit write; the audit never masks the failure.
#[derive(Debug, Clone)]
pub struct QueryService {
    directory: PlaygroundService,
    store: MetadataStore,
    sandbox: SandboxDataset,
}

/// What the engine produced for one statement, before timing is attached.
enum Execution {
    /// Read path: fetched rows and their column names.
    Rows {
        columns: Vec<String>,
        rows: Vec<serde_json::Value>,
    },
    /// Write/DDL path: executed for effect only.
    Ack,
}

impl QueryService {
    /// Creates a new `QueryService` over the given stores.
    ///
    /// Playground existence checks go through the directory service, not
    /// the store; the store handle is kept for the audit write only.
    #[must_use]
    pub fn new(store: MetadataStore, sandbox: SandboxDataset) -> Self {
        Self {
            directory: PlaygroundService::new(store.clone()),
            store,
            sandbox,
        }
    }

    /// Executes `sql` verbatim against the sandbox dataset.
    ///
    /// Preconditions are checked before any side effect: empty text and
    /// unknown playgrounds fail without an audit write (there is nothing,
    /// or no one, to attribute the record to). Past that point the attempt
    /// is always recorded. Query execution never touches the playground
    /// record itself; `updated_at` is a rename concern only.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for empty text,
    /// [`GatewayError::PlaygroundNotFound`] for an unknown playground,
    /// [`GatewayError::QueryFailed`] with the engine's message when the SQL
    /// is rejected, or a persistence error if the audit write fails.
    pub async fn execute(
        &self,
        playground_id: PlaygroundId,
        sql: &str,
    ) -> Result<QueryResult, GatewayError> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "query text is required".to_string(),
            ));
        }
        if self.directory.get(playground_id).await?.is_none() {
            return Err(GatewayError::PlaygroundNotFound(playground_id));
        }

        let started = Instant::now();
        let run = self.run_statement(sql).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let outcome = match run {
            Ok(Execution::Rows { columns, rows }) => {
                QueryOutcome::Success(QueryResult::from_rows(columns, rows, elapsed_ms))
            }
            Ok(Execution::Ack) => QueryOutcome::Success(QueryResult::statement_ack(elapsed_ms)),
            Err(e) => QueryOutcome::Failure(engine_message(&e)),
        };

        // Single audit point: every code path leaving the execution lands
        // here, success or failure, before anything propagates.
        let record = QueryHistoryRecord {
            id: Uuid::new_v4(),
            playground_id,
            query_text: sql.to_string(),
            outcome,
            executed_at: Utc::now(),
        };
        self.store.insert_history(&record).await?;

        match record.outcome {
            QueryOutcome::Success(result) => Ok(result),
            QueryOutcome::Failure(message) => {
                tracing::debug!(%playground_id, %message, "query rejected by engine");
                Err(GatewayError::QueryFailed(message))
            }
        }
    }

    /// Dispatches one statement to the sandbox engine.
    async fn run_statement(&self, sql: &str) -> Result<Execution, sqlx::Error> {
        if is_select(sql) {
            let fetched = sqlx::query(sql)
                .persistent(false)
                .fetch_all(self.sandbox.pool())
                .await?;

            // A zero-row result set cannot report its column names; the
            // columns come from the first row, in engine order.
            let columns: Vec<String> = fetched
                .first()
                .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
                .unwrap_or_default();
            let rows = fetched.iter().map(row_to_json).collect();
            Ok(Execution::Rows { columns, rows })
        } else {
            sqlx::query(sql)
                .persistent(false)
                .execute(self.sandbox.pool())
                .await?;
            Ok(Execution::Ack)
        }
    }
}

/// Statement-kind heuristic: does the trimmed text begin with `SELECT`?
///
/// Deliberately not a parser. A CTE such as `WITH t AS (...) SELECT ...`
/// lands on the write path and gets the synthesized acknowledgement row.
fn is_select(sql: &str) -> bool {
    sql.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

/// Converts one fetched row into a JSON object keyed by column name.
fn row_to_json(row: &SqliteRow) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), extract_value(row, index));
    }
    serde_json::Value::Object(map)
}

/// Decodes a single cell into JSON based on its SQLite storage class.
fn extract_value(row: &SqliteRow, index: usize) -> serde_json::Value {
    let Ok(raw) = row.try_get_raw(index) else {
        return serde_json::Value::Null;
    };
    if raw.is_null() {
        return serde_json::Value::Null;
    }
    let type_name = raw.type_info().name().to_uppercase();

    match type_name.as_str() {
        "INTEGER" | "INT" | "BIGINT" => {
            if let Ok(v) = row.try_get::<i64, _>(index) {
                return serde_json::Value::Number(v.into());
            }
        }
        "REAL" | "NUMERIC" => {
            if let Ok(v) = row.try_get::<f64, _>(index) {
                return serde_json::Number::from_f64(v)
                    .map(serde_json::Value::Number)
                    .unwrap_or_else(|| serde_json::Value::String(v.to_string()));
            }
        }
        "BOOLEAN" => {
            if let Ok(v) = row.try_get::<bool, _>(index) {
                return serde_json::Value::Bool(v);
            }
        }
        "BLOB" => {
            if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
                return serde_json::Value::String(format!("x'{}'", hex::encode(v)));
            }
        }
        // TEXT, DATE, TIME, DATETIME and anything else fall through to the
        // string fallback below.
        _ => {}
    }

    if let Ok(v) = row.try_get::<String, _>(index) {
        return serde_json::Value::String(v);
    }
    serde_json::Value::Null
}

/// Pulls the engine's own message out of a driver error when there is one.
fn engine_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Playground;
    use crate::domain::query_result::STATEMENT_ACK_MESSAGE;
    use std::time::Duration;

    async fn make_service() -> (QueryService, PlaygroundId) {
        let store = MetadataStore::connect("sqlite::memory:", 1, Duration::from_secs(5))
            .await
            .ok()
            .unwrap_or_else(|| panic!("in-memory store should open"));
        let sandbox = SandboxDataset::create()
            .await
            .ok()
            .unwrap_or_else(|| panic!("sandbox should build"));

        let playground = Playground::new("Demo".to_string());
        store
            .insert_playground(&playground)
            .await
            .ok()
            .unwrap_or_else(|| panic!("seed playground insert failed"));

        (QueryService::new(store, sandbox), playground.id)
    }

    async fn history_len(service: &QueryService, id: PlaygroundId) -> usize {
        service
            .store
            .list_history(id, 50)
            .await
            .ok()
            .map(|h| h.len())
            .unwrap_or_else(|| panic!("history query failed"))
    }

    #[test]
    fn select_prefix_check_is_case_insensitive() {
        assert!(is_select("SELECT 1"));
        assert!(is_select("select * from employees"));
        assert!(is_select("SeLeCt 1"));
        assert!(!is_select("INSERT INTO t VALUES (1)"));
        assert!(!is_select("WITH t AS (SELECT 1) SELECT * FROM t"));
        assert!(!is_select("sel"));
    }

    #[tokio::test]
    async fn select_all_employees_returns_seed_rows() {
        let (service, id) = make_service().await;
        let Ok(result) = service.execute(id, "SELECT * FROM employees").await else {
            panic!("execute failed");
        };
        assert_eq!(result.row_count, 8);
        for col in ["id", "name", "department", "salary", "hire_date"] {
            assert!(result.columns.iter().any(|c| c == col), "missing {col}");
        }
        assert_eq!(history_len(&service, id).await, 1);
    }

    #[tokio::test]
    async fn zero_row_select_has_no_columns() {
        let (service, id) = make_service().await;
        let Ok(result) = service
            .execute(id, "SELECT * FROM employees WHERE id = -1")
            .await
        else {
            panic!("execute failed");
        };
        assert!(result.columns.is_empty());
        assert_eq!(result.row_count, 0);
    }

    #[tokio::test]
    async fn write_statement_gets_synthesized_ack() {
        let (service, id) = make_service().await;
        let Ok(result) = service
            .execute(
                id,
                "INSERT INTO employees (name, department, salary) VALUES ('Z', 'Eng', 1)",
            )
            .await
        else {
            panic!("execute failed");
        };
        assert_eq!(result.columns, vec!["message".to_string()]);
        assert_eq!(
            result.rows.first().and_then(|r| r.get("message")),
            Some(&serde_json::json!(STATEMENT_ACK_MESSAGE))
        );

        // The mutation is visible for the rest of the process lifetime.
        let Ok(count) = service.execute(id, "SELECT COUNT(*) as c FROM employees").await else {
            panic!("count failed");
        };
        assert_eq!(
            count.rows.first().and_then(|r| r.get("c")),
            Some(&serde_json::json!(9))
        );
    }

    #[tokio::test]
    async fn rebuilt_sandbox_restores_seed() {
        let (service, id) = make_service().await;
        let inserted = service
            .execute(
                id,
                "INSERT INTO employees (name, department, salary) VALUES ('Z', 'Eng', 1)",
            )
            .await;
        assert!(inserted.is_ok());

        // Simulated restart: same metadata store, fresh dataset.
        let fresh = SandboxDataset::create()
            .await
            .ok()
            .unwrap_or_else(|| panic!("sandbox should rebuild"));
        let restarted = QueryService::new(service.store.clone(), fresh);
        let Ok(count) = restarted
            .execute(id, "SELECT COUNT(*) as c FROM employees")
            .await
        else {
            panic!("count failed");
        };
        assert_eq!(
            count.rows.first().and_then(|r| r.get("c")),
            Some(&serde_json::json!(8))
        );
    }

    #[tokio::test]
    async fn failed_query_is_audited_then_propagated() {
        let (service, id) = make_service().await;
        let result = service.execute(id, "SELECT * FROM nonexistent_table").await;
        let Err(GatewayError::QueryFailed(message)) = result else {
            panic!("expected QueryFailed");
        };
        assert!(message.contains("nonexistent_table"));

        let Ok(history) = service.store.list_history(id, 50).await else {
            panic!("history query failed");
        };
        assert_eq!(history.len(), 1);
        assert!(matches!(
            history.first().map(|r| &r.outcome),
            Some(QueryOutcome::Failure(stored)) if stored.contains("nonexistent_table")
        ));
    }

    #[tokio::test]
    async fn empty_query_fails_without_audit() {
        let (service, id) = make_service().await;
        assert!(matches!(
            service.execute(id, "   ").await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert_eq!(history_len(&service, id).await, 0);
    }

    #[tokio::test]
    async fn unknown_playground_fails_without_audit() {
        let (service, _) = make_service().await;
        let ghost = PlaygroundId::new();
        assert!(matches!(
            service.execute(ghost, "SELECT 1").await,
            Err(GatewayError::PlaygroundNotFound(_))
        ));
        assert_eq!(history_len(&service, ghost).await, 0);
    }

    #[tokio::test]
    async fn every_attempt_adds_exactly_one_history_record() {
        let (service, id) = make_service().await;
        let _ = service.execute(id, "SELECT 1").await;
        let _ = service.execute(id, "not sql at all").await;
        let _ = service.execute(id, "DELETE FROM employees WHERE id = 1").await;
        assert_eq!(history_len(&service, id).await, 3);
    }

    #[tokio::test]
    async fn execution_does_not_touch_playground_updated_at() {
        let (service, id) = make_service().await;
        let Ok(Some(before)) = service.store.get_playground(id).await else {
            panic!("playground should exist");
        };
        let _ = service.execute(id, "SELECT 1").await;
        let Ok(Some(after)) = service.store.get_playground(id).await else {
            panic!("playground should exist");
        };
        assert_eq!(before.updated_at, after.updated_at);
    }

    #[tokio::test]
    async fn null_and_real_cells_decode_to_json() {
        let (service, id) = make_service().await;
        let Ok(result) = service
            .execute(id, "SELECT NULL as n, 1.5 as r, 'txt' as t")
            .await
        else {
            panic!("execute failed");
        };
        let Some(row) = result.rows.first() else {
            panic!("expected one row");
        };
        assert_eq!(row.get("n"), Some(&serde_json::Value::Null));
        assert_eq!(row.get("r"), Some(&serde_json::json!(1.5)));
        assert_eq!(row.get("t"), Some(&serde_json::json!("txt")));
    }

    #[tokio::test]
    async fn blob_and_declared_boolean_cells_decode_to_json() {
        let (service, id) = make_service().await;
        // Boolean decoding depends on the declared column type: a bare
        // comparison expression surfaces as INTEGER, so the bool rendering
        // only applies to columns declared BOOLEAN.
        let created = service
            .execute(id, "CREATE TABLE flags (ok BOOLEAN)")
            .await;
        assert!(created.is_ok());
        let inserted = service
            .execute(id, "INSERT INTO flags (ok) VALUES (1)")
            .await;
        assert!(inserted.is_ok());

        let Ok(result) = service
            .execute(id, "SELECT x'01ff' AS b, ok FROM flags")
            .await
        else {
            panic!("execute failed");
        };
        let Some(row) = result.rows.first() else {
            panic!("expected one row");
        };
        assert_eq!(row.get("b"), Some(&serde_json::json!("x'01ff'")));
        assert_eq!(row.get("ok"), Some(&serde_json::json!(true)));
    }
}
