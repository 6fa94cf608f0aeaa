//! Query execution handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::ExecuteQueryRequest;
use crate::app_state::AppState;
use crate::domain::{PlaygroundId, QueryResult};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /playgrounds/:id/execute` — Run SQL against the sandbox dataset.
///
/// Every attempt that passes validation is recorded in the playground's
/// history, whether the engine accepts it or not.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for empty query text,
/// [`GatewayError::PlaygroundNotFound`] for an unknown playground, or
/// [`GatewayError::QueryFailed`] with the engine's message.
#[utoipa::path(
    post,
    path = "/api/v1/playgrounds/{id}/execute",
    tag = "Queries",
    summary = "Execute SQL",
    description = "Executes arbitrary SQL against the sample dataset and records the attempt in the playground's history. SELECT statements return rows; anything else returns a synthesized acknowledgement row.",
    params(
        ("id" = uuid::Uuid, Path, description = "Playground UUID"),
    ),
    request_body = ExecuteQueryRequest,
    responses(
        (status = 200, description = "Normalized query result", body = QueryResult),
        (status = 400, description = "Empty query or engine rejection", body = ErrorResponse),
        (status = 404, description = "Playground not found", body = ErrorResponse),
    )
)]
pub async fn execute_query(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<ExecuteQueryRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let result = state
        .queries
        .execute(PlaygroundId::from_uuid(id), &req.query)
        .await?;
    Ok(Json(result))
}

/// Query execution routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/playgrounds/{id}/execute", post(execute_query))
}
