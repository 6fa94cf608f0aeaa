//! Service layer: business logic orchestration.
//!
//! [`PlaygroundService`] owns the playground directory (CRUD + history
//! access); [`QueryService`] owns the execute-then-audit path against the
//! sandbox dataset. Both are thin coordinators over the persistence layer.

pub mod playground_service;
pub mod query_service;

pub use playground_service::PlaygroundService;
pub use query_service::QueryService;
