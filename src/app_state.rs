//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{PlaygroundService, QueryService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Playground directory and history access.
    pub playgrounds: Arc<PlaygroundService>,
    /// Query execution and audit.
    pub queries: Arc<QueryService>,
}
