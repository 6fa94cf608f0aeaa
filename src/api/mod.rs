//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; system endpoints
//! (`/health`, `/config/sample-schema`) live at the root. With the
//! `swagger-ui` feature enabled, interactive docs are served at `/docs`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "sqlbox-gateway",
        description = "Browser-based SQL sandbox: playgrounds, query execution, history."
    ),
    paths(
        handlers::playground::list_playgrounds,
        handlers::playground::create_playground,
        handlers::playground::get_playground,
        handlers::playground::update_playground,
        handlers::playground::delete_playground,
        handlers::playground::list_queries,
        handlers::query::execute_query,
        handlers::system::health_handler,
        handlers::system::sample_schema_handler,
    ),
    tags(
        (name = "Playgrounds", description = "Playground lifecycle and history"),
        (name = "Queries", description = "SQL execution against the sample dataset"),
        (name = "System", description = "Health and sandbox metadata"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
