//! Playground request DTOs.
//!
//! Responses reuse [`crate::domain::Playground`] directly; the stored
//! record is already the wire shape.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /playgrounds`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlaygroundRequest {
    /// Display name; must be non-empty after trimming.
    pub name: String,
}

/// Request body for `PUT /playgrounds/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlaygroundRequest {
    /// New display name; must be non-empty after trimming.
    pub name: String,
}
