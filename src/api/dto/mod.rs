//! Data Transfer Objects for REST request/response serialization.
//!
//! Playground records and query results serialize straight from their
//! domain types; everything request-shaped or history-shaped lives here.

pub mod playground_dto;
pub mod query_dto;

pub use playground_dto::*;
pub use query_dto::*;
