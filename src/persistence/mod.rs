//! Persistence layer: the two SQLite stores.
//!
//! [`metadata::MetadataStore`] is the durable system of record for
//! playgrounds and query history. [`sandbox::SandboxDataset`] is the
//! ephemeral in-memory dataset user SQL executes against; it is rebuilt
//! from its seed on every process start and intentionally never persisted.

pub mod metadata;
pub mod sandbox;

pub use metadata::MetadataStore;
pub use sandbox::SandboxDataset;
