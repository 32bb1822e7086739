//! Data store for the admin application.
//!
//! # Database: `PostgreSQL`, schema `roya`
//!
//! ## Tables
//!
//! - `app_user` - Login accounts (`username`, `password_hash`, `is_admin`)
//! - `product` - Catalog (`id`, `title`)
//! - `basket` - Baskets with line items embedded as a JSONB document
//! - `tower_sessions.session` - Session storage (created by `roya-cli migrate`)
//!
//! Product and basket ids are time-based tokens and deliberately not unique
//! constraints.
//!
//! # Access
//!
//! Handlers talk to the [`Store`] trait object held by `AppState`.
//! [`PgStore`] is the production implementation. `MemoryStore` keeps
//! everything in process and backs the test suites; it is only compiled for
//! tests and with the `test-util` feature.
//!
//! Mutations by id are single conditional statements that report whether a
//! row matched. Nothing is transactional: a handler that reads and then
//! writes can interleave with another request's delete. Last write wins.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p roya-cli -- migrate
//! ```

pub mod baskets;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use baskets::BasketStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use products::ProductStore;
pub use users::UserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Everything the handlers need from persistence.
#[async_trait]
pub trait Store: UserStore + ProductStore + BasketStore {
    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store cannot be reached.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to `RepositoryError::Conflict`.
fn conflict_or_database(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
