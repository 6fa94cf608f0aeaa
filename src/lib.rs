//! # sqlbox-gateway
//!
//! REST API backend for a browser-based SQL sandbox. Users create named
//! "playgrounds", submit arbitrary SQL against a fixed in-memory sample
//! dataset, and get back normalized results plus a durable history of
//! every execution attempt.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PlaygroundService (service/)   — playground CRUD + history access
//!     ├── QueryService (service/)        — execute SQL + audit every attempt
//!     │
//!     ├── MetadataStore (persistence/)   — durable SQLite: playgrounds, queries
//!     └── SandboxDataset (persistence/)  — in-memory SQLite: seeded sample data
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
