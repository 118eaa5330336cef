//! # Lousa DB
//!
//! Database pool and utilities for the Lousa accounts API.
//!
//! This crate provides PostgreSQL connection pool initialization using SQLx,
//! and helpers for interpreting constraint violations reported by the store.
//!
//! # Example
//!
//! ```ignore
//! use lousa_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool().await;
//!     // Use pool for database operations
//! }
//! ```

use std::env;

use sqlx::postgres::PgPoolOptions;

/// Initializes a PostgreSQL connection pool.
///
/// Reads `DATABASE_URL` and, optionally, `DATABASE_MAX_CONNECTIONS`
/// (default 10).
///
/// # Panics
///
/// Panics if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
///
/// # Note
///
/// Call once during startup. The returned pool is cheaply cloneable and
/// lives in the application state.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Returns the violated constraint name when `err` is a unique violation.
///
/// Unique indexes are the authority on email/CPF/token uniqueness; services
/// use this to turn a lost insert race into a field-level validation error.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
