//! Playground CRUD and history handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreatePlaygroundRequest, HistoryParams, QueryHistoryDto, UpdatePlaygroundRequest,
};
use crate::app_state::AppState;
use crate::domain::{Playground, PlaygroundId};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /playgrounds` — List all playgrounds, most recently updated first.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/playgrounds",
    tag = "Playgrounds",
    summary = "List playgrounds",
    description = "Returns every playground, ordered by last update descending.",
    responses(
        (status = 200, description = "All playgrounds", body = Vec<Playground>),
    )
)]
pub async fn list_playgrounds(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let playgrounds = state.playgrounds.list().await?;
    Ok(Json(playgrounds))
}

/// `POST /playgrounds` — Create a new playground.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the name is empty after
/// trimming.
#[utoipa::path(
    post,
    path = "/api/v1/playgrounds",
    tag = "Playgrounds",
    summary = "Create a playground",
    description = "Creates a named playground. The name is trimmed and must be non-empty.",
    request_body = CreatePlaygroundRequest,
    responses(
        (status = 201, description = "Playground created", body = Playground),
        (status = 400, description = "Empty name", body = ErrorResponse),
    )
)]
pub async fn create_playground(
    State(state): State<AppState>,
    Json(req): Json<CreatePlaygroundRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let playground = state.playgrounds.create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(playground)))
}

/// `GET /playgrounds/:id` — Get one playground.
///
/// # Errors
///
/// Returns [`GatewayError::PlaygroundNotFound`] if the ID is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/playgrounds/{id}",
    tag = "Playgrounds",
    summary = "Get a playground",
    params(
        ("id" = uuid::Uuid, Path, description = "Playground UUID"),
    ),
    responses(
        (status = 200, description = "Playground record", body = Playground),
        (status = 404, description = "Playground not found", body = ErrorResponse),
    )
)]
pub async fn get_playground(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = PlaygroundId::from_uuid(id);
    let playground = state
        .playgrounds
        .get(id)
        .await?
        .ok_or(GatewayError::PlaygroundNotFound(id))?;
    Ok(Json(playground))
}

/// `PUT /playgrounds/:id` — Rename a playground.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for an empty name or
/// [`GatewayError::PlaygroundNotFound`] for an unknown ID.
#[utoipa::path(
    put,
    path = "/api/v1/playgrounds/{id}",
    tag = "Playgrounds",
    summary = "Rename a playground",
    description = "Sets a new name and refreshes the updated_at timestamp.",
    params(
        ("id" = uuid::Uuid, Path, description = "Playground UUID"),
    ),
    request_body = UpdatePlaygroundRequest,
    responses(
        (status = 204, description = "Playground renamed"),
        (status = 400, description = "Empty name", body = ErrorResponse),
        (status = 404, description = "Playground not found", body = ErrorResponse),
    )
)]
pub async fn update_playground(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdatePlaygroundRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .playgrounds
        .update(PlaygroundId::from_uuid(id), &req.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /playgrounds/:id` — Delete a playground and its history.
///
/// # Errors
///
/// Returns [`GatewayError::PlaygroundNotFound`] if the ID is unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/playgrounds/{id}",
    tag = "Playgrounds",
    summary = "Delete a playground",
    description = "Removes the playground; its query history goes with it (cascade).",
    params(
        ("id" = uuid::Uuid, Path, description = "Playground UUID"),
    ),
    responses(
        (status = 204, description = "Playground deleted"),
        (status = 404, description = "Playground not found", body = ErrorResponse),
    )
)]
pub async fn delete_playground(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state.playgrounds.delete(PlaygroundId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /playgrounds/:id/queries` — Recent query history, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::PlaygroundNotFound`] if the ID is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/playgrounds/{id}/queries",
    tag = "Playgrounds",
    summary = "List query history",
    description = "Returns up to 50 most recent execution attempts for the playground, newest first.",
    params(
        ("id" = uuid::Uuid, Path, description = "Playground UUID"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "History records", body = Vec<QueryHistoryDto>),
        (status = 404, description = "Playground not found", body = ErrorResponse),
    )
)]
pub async fn list_queries(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let id = PlaygroundId::from_uuid(id);
    // The route validates existence so the UI gets a 404 rather than an
    // empty list for a stale playground ID.
    if state.playgrounds.get(id).await?.is_none() {
        return Err(GatewayError::PlaygroundNotFound(id));
    }

    let records = state.playgrounds.history(id, params.clamped()).await?;
    let dtos: Vec<QueryHistoryDto> = records
        .into_iter()
        .map(QueryHistoryDto::try_from)
        .collect::<Result<_, _>>()?;
    Ok(Json(dtos))
}

/// Playground management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/playgrounds",
            get(list_playgrounds).post(create_playground),
        )
        .route(
            "/playgrounds/{id}",
            get(get_playground)
                .put(update_playground)
                .delete(delete_playground),
        )
        .route("/playgrounds/{id}/queries", get(list_queries))
}
