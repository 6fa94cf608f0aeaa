//! Playground directory: CRUD lifecycle and history access.

use chrono::Utc;

use crate::domain::{Playground, PlaygroundId, QueryHistoryRecord};
use crate::error::GatewayError;
use crate::persistence::MetadataStore;

/// Default and maximum number of history records returned per playground.
pub const HISTORY_LIMIT: u32 = 50;

/// CRUD lifecycle for playground records plus read-only history retrieval.
///
/// Validation happens here, before any store write: empty names never reach
/// the database, and rename/delete of an unknown ID surfaces as a not-found
/// error derived from the affected row count.
#[derive(Debug, Clone)]
pub struct PlaygroundService {
    store: MetadataStore,
}

impl PlaygroundService {
    /// Creates a new `PlaygroundService` over the given store.
    #[must_use]
    pub fn new(store: MetadataStore) -> Self {
        Self { store }
    }

    /// Returns all playgrounds, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on store failure.
    pub async fn list(&self) -> Result<Vec<Playground>, GatewayError> {
        self.store.list_playgrounds().await
    }

    /// Creates a playground from a display name.
    ///
    /// The name is trimmed before storage; `created_at == updated_at` on the
    /// returned record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the name is empty after
    /// trimming, or a persistence error from the store.
    pub async fn create(&self, name: &str) -> Result<Playground, GatewayError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "playground name is required".to_string(),
            ));
        }

        let playground = Playground::new(name.to_string());
        self.store.insert_playground(&playground).await?;

        tracing::info!(id = %playground.id, name = %playground.name, "playground created");
        Ok(playground)
    }

    /// Looks up a playground; absence is `None`, not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on store failure.
    pub async fn get(&self, id: PlaygroundId) -> Result<Option<Playground>, GatewayError> {
        self.store.get_playground(id).await
    }

    /// Renames a playground, refreshing its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty name,
    /// [`GatewayError::PlaygroundNotFound`] for an unknown ID, or a
    /// persistence error from the store.
    pub async fn update(&self, id: PlaygroundId, name: &str) -> Result<(), GatewayError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "playground name is required".to_string(),
            ));
        }

        let rows = self.store.update_playground(id, name, Utc::now()).await?;
        if rows == 0 {
            return Err(GatewayError::PlaygroundNotFound(id));
        }
        Ok(())
    }

    /// Deletes a playground and, via cascade, all its history records.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PlaygroundNotFound`] for an unknown ID, or a
    /// persistence error from the store.
    pub async fn delete(&self, id: PlaygroundId) -> Result<(), GatewayError> {
        let rows = self.store.delete_playground(id).await?;
        if rows == 0 {
            return Err(GatewayError::PlaygroundNotFound(id));
        }
        tracing::info!(%id, "playground deleted");
        Ok(())
    }

    /// Returns up to `limit` most recent executions for a playground,
    /// newest first. `limit` is clamped to `1..=50`; an unknown playground
    /// yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on store failure.
    pub async fn history(
        &self,
        id: PlaygroundId,
        limit: Option<u32>,
    ) -> Result<Vec<QueryHistoryRecord>, GatewayError> {
        let limit = limit.unwrap_or(HISTORY_LIMIT).clamp(1, HISTORY_LIMIT);
        self.store.list_history(id, limit).await
    }
}
