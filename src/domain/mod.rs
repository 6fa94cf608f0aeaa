//! Domain layer: core types for playgrounds, query results, and history.
//!
//! This module contains the server-side domain model: playground identity,
//! the playground record itself, the normalized query result shape, and the
//! tagged success/failure outcome stored in every history record.

pub mod playground;
pub mod playground_id;
pub mod query_result;

pub use playground::{Playground, QueryHistoryRecord, QueryOutcome};
pub use playground_id::PlaygroundId;
pub use query_result::QueryResult;
