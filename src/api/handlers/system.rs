//! System endpoints: health check and sandbox schema catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    status: String,
    /// Current server time, RFC 3339.
    timestamp: String,
    /// Crate version.
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One sandbox table as exposed to the query editor.
#[derive(Debug, Serialize, ToSchema)]
pub struct SandboxTableInfo {
    /// Table name.
    table: &'static str,
    /// Column names in declaration order.
    columns: Vec<&'static str>,
    /// Number of seed rows present at process start.
    seed_rows: u32,
}

/// `GET /config/sample-schema` — Catalog of the sandbox tables.
///
/// The sample dataset is fixed, so this catalog is static; the editor UI
/// uses it for autocomplete and the schema sidebar.
#[utoipa::path(
    get,
    path = "/config/sample-schema",
    tag = "System",
    summary = "Describe the sample dataset",
    description = "Returns the tables, columns, and seed row counts of the in-memory sample dataset queries run against.",
    responses(
        (status = 200, description = "Sandbox table catalog", body = Vec<SandboxTableInfo>),
    )
)]
pub async fn sample_schema_handler() -> impl IntoResponse {
    let tables = vec![
        SandboxTableInfo {
            table: "employees",
            columns: vec!["id", "name", "department", "salary", "hire_date"],
            seed_rows: 8,
        },
        SandboxTableInfo {
            table: "departments",
            columns: vec!["id", "name", "budget"],
            seed_rows: 4,
        },
    ];
    (StatusCode::OK, Json(tables))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/sample-schema", get(sample_schema_handler))
}
