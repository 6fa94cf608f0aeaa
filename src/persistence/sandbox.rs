//! Ephemeral in-memory sample dataset that playground queries run against.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::GatewayError;

/// Fixed seed: two tables, 4 departments, 8 employees. Employee department
/// values line up with department names by convention only; no foreign key
/// enforces it, matching the workspace data users are meant to explore.
const SEED: &str = r"
CREATE TABLE employees (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    department TEXT,
    salary INTEGER,
    hire_date DATE
);

CREATE TABLE departments (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    budget INTEGER
);

INSERT INTO departments (name, budget) VALUES
    ('Engineering', 1000000),
    ('Marketing', 500000),
    ('Sales', 750000),
    ('HR', 300000);

INSERT INTO employees (name, department, salary, hire_date) VALUES
    ('John Doe', 'Engineering', 85000, '2022-01-15'),
    ('Jane Smith', 'Marketing', 65000, '2021-03-20'),
    ('Bob Johnson', 'Engineering', 92000, '2020-07-10'),
    ('Alice Brown', 'Sales', 58000, '2023-02-01'),
    ('Charlie Wilson', 'HR', 55000, '2021-11-05'),
    ('Diana Davis', 'Engineering', 78000, '2022-05-12'),
    ('Eve Miller', 'Marketing', 62000, '2023-01-08'),
    ('Frank Garcia', 'Sales', 71000, '2022-09-15');
";

/// The non-durable relational dataset users query.
///
/// Constructed once at startup and injected into the query executor; never
/// reached through ambient global state. Re-created identically on every
/// process start, so user mutations live only for the process lifetime.
#[derive(Debug, Clone)]
pub struct SandboxDataset {
    pool: SqlitePool,
}

impl SandboxDataset {
    /// Builds a fresh in-memory dataset and seeds it.
    ///
    /// An in-memory SQLite database is private to its connection, so the
    /// pool is pinned to exactly one connection with no idle timeout or max
    /// lifetime. Recycling the sole connection would silently drop every
    /// table.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be opened or seeded.
    pub async fn create() -> Result<Self, GatewayError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        sqlx::raw_sql(SEED)
            .execute(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(Self { pool })
    }

    /// The pool arbitrary user SQL is executed against.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
