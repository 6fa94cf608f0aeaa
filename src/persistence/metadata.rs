//! Durable SQLite metadata store: playground records and query history.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::domain::{Playground, PlaygroundId, QueryHistoryRecord, QueryOutcome};
use crate::error::GatewayError;

/// Schema applied at connect time. `CREATE TABLE IF NOT EXISTS` keeps the
/// store reusable across restarts without a migration step.
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS playgrounds (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS queries (
    id TEXT PRIMARY KEY,
    playground_id TEXT NOT NULL,
    query TEXT NOT NULL,
    result TEXT,
    status TEXT NOT NULL DEFAULT 'success',
    executed_at TEXT NOT NULL,
    FOREIGN KEY (playground_id) REFERENCES playgrounds (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_queries_playground_executed
    ON queries (playground_id, executed_at DESC);
";

/// SQLite-backed durable store for playgrounds and their query history.
///
/// Survives process restarts (file database in production). Foreign keys are
/// enabled on every connection so that deleting a playground cascades to its
/// history rows.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    pool: SqlitePool,
}

impl MetadataStore {
    /// Opens (creating if missing) the metadata database and applies the
    /// schema.
    ///
    /// SQLite in-memory databases are private to their connection, so a
    /// `:memory:` URL pins the pool to a single never-expiring connection.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be opened or the schema cannot be applied.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(connect_timeout);
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(Self { pool })
    }

    // ── Playgrounds ─────────────────────────────────────────────────────

    /// Inserts a new playground record.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn insert_playground(&self, playground: &Playground) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO playgrounds (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(playground.id.as_uuid())
            .bind(&playground.name)
            .bind(playground.created_at)
            .bind(playground.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(())
    }

    /// Loads all playgrounds, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_playgrounds(&self) -> Result<Vec<Playground>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, name, created_at, updated_at FROM playgrounds ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, created_at, updated_at)| Playground {
                id: PlaygroundId::from_uuid(id),
                name,
                created_at,
                updated_at,
            })
            .collect())
    }

    /// Loads a single playground, or `None` if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn get_playground(
        &self,
        id: PlaygroundId,
    ) -> Result<Option<Playground>, GatewayError> {
        let row = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, name, created_at, updated_at FROM playgrounds WHERE id = ?1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row.map(|(id, name, created_at, updated_at)| Playground {
            id: PlaygroundId::from_uuid(id),
            name,
            created_at,
            updated_at,
        }))
    }

    /// Renames a playground and refreshes `updated_at`. Returns the number
    /// of rows updated (zero for an unknown ID).
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn update_playground(
        &self,
        id: PlaygroundId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, GatewayError> {
        let result = sqlx::query("UPDATE playgrounds SET name = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(name)
            .bind(updated_at)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Deletes a playground; its history rows go with it via the foreign-key
    /// cascade. Returns the number of playground rows deleted.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete_playground(&self, id: PlaygroundId) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM playgrounds WHERE id = ?1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(result.rows_affected())
    }

    // ── Query history ───────────────────────────────────────────────────

    /// Appends one history record for an execution attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure, or
    /// a [`GatewayError::Internal`] if the outcome payload cannot be
    /// serialized.
    pub async fn insert_history(&self, record: &QueryHistoryRecord) -> Result<(), GatewayError> {
        let payload = record
            .outcome
            .to_payload()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO queries (id, playground_id, query, result, status, executed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(record.id)
        .bind(record.playground_id.as_uuid())
        .bind(&record.query_text)
        .bind(payload)
        .bind(record.outcome.status())
        .bind(record.executed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(())
    }

    /// Loads up to `limit` most recent history records for a playground,
    /// newest first. An unknown playground yields an empty vec, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure, or
    /// a [`GatewayError::Internal`] if a stored success payload no longer
    /// parses.
    pub async fn list_history(
        &self,
        playground_id: PlaygroundId,
        limit: u32,
    ) -> Result<Vec<QueryHistoryRecord>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, String, String, String, DateTime<Utc>)>(
            "SELECT id, playground_id, query, result, status, executed_at FROM queries \
             WHERE playground_id = ?1 ORDER BY executed_at DESC LIMIT ?2",
        )
        .bind(playground_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        rows.into_iter()
            .map(|(id, pid, query_text, payload, status, executed_at)| {
                let outcome = QueryOutcome::from_stored(&status, payload)
                    .map_err(|e| GatewayError::Internal(e.to_string()))?;
                Ok(QueryHistoryRecord {
                    id,
                    playground_id: PlaygroundId::from_uuid(pid),
                    query_text,
                    outcome,
                    executed_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::QueryResult;

    async fn memory_store() -> MetadataStore {
        MetadataStore::connect("sqlite::memory:", 1, Duration::from_secs(5))
            .await
            .ok()
            .unwrap_or_else(|| panic!("in-memory store should open"))
    }

    fn history_record(playground_id: PlaygroundId, outcome: QueryOutcome) -> QueryHistoryRecord {
        QueryHistoryRecord {
            id: Uuid::new_v4(),
            playground_id,
            query_text: "SELECT 1".to_string(),
            outcome,
            executed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let store = memory_store().await;
        let pg = Playground::new("Demo".to_string());
        assert!(store.insert_playground(&pg).await.is_ok());

        let loaded = store.get_playground(pg.id).await;
        let Ok(Some(loaded)) = loaded else {
            panic!("playground should exist");
        };
        assert_eq!(loaded.id, pg.id);
        assert_eq!(loaded.name, "Demo");
    }

    #[tokio::test]
    async fn get_unknown_is_none() {
        let store = memory_store().await;
        let loaded = store.get_playground(PlaygroundId::new()).await;
        assert!(matches!(loaded, Ok(None)));
    }

    #[tokio::test]
    async fn list_orders_by_updated_at_desc() {
        let store = memory_store().await;
        let first = Playground::new("first".to_string());
        let second = Playground::new("second".to_string());
        assert!(store.insert_playground(&first).await.is_ok());
        assert!(store.insert_playground(&second).await.is_ok());

        // Bump "first" so it becomes the most recently updated.
        let bumped = Utc::now() + chrono::Duration::seconds(1);
        assert!(
            store
                .update_playground(first.id, "first renamed", bumped)
                .await
                .is_ok()
        );

        let Ok(all) = store.list_playgrounds().await else {
            panic!("list failed");
        };
        assert_eq!(all.len(), 2);
        assert_eq!(all.first().map(|p| p.id), Some(first.id));
    }

    #[tokio::test]
    async fn update_unknown_affects_zero_rows() {
        let store = memory_store().await;
        let rows = store
            .update_playground(PlaygroundId::new(), "x", Utc::now())
            .await;
        assert_eq!(rows.ok(), Some(0));
    }

    #[tokio::test]
    async fn delete_cascades_to_history() {
        let store = memory_store().await;
        let pg = Playground::new("doomed".to_string());
        assert!(store.insert_playground(&pg).await.is_ok());

        let record = history_record(pg.id, QueryOutcome::Success(QueryResult::statement_ack(1)));
        assert!(store.insert_history(&record).await.is_ok());

        let rows = store.delete_playground(pg.id).await;
        assert_eq!(rows.ok(), Some(1));

        let Ok(history) = store.list_history(pg.id, 50).await else {
            panic!("history query failed");
        };
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn history_respects_limit_and_order() {
        let store = memory_store().await;
        let pg = Playground::new("busy".to_string());
        assert!(store.insert_playground(&pg).await.is_ok());

        let base = Utc::now();
        for i in 0..5 {
            let mut record =
                history_record(pg.id, QueryOutcome::Failure(format!("attempt {i} failed")));
            record.executed_at = base + chrono::Duration::seconds(i);
            assert!(store.insert_history(&record).await.is_ok());
        }

        let Ok(history) = store.list_history(pg.id, 3).await else {
            panic!("history query failed");
        };
        assert_eq!(history.len(), 3);
        // Newest first.
        assert_eq!(
            history.first().map(|r| r.executed_at),
            Some(base + chrono::Duration::seconds(4))
        );
        assert!(matches!(
            history.first().map(|r| &r.outcome),
            Some(QueryOutcome::Failure(msg)) if msg == "attempt 4 failed"
        ));
    }
}
