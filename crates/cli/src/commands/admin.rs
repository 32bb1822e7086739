//! Admin account maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Reset a forgotten password (new password read from stdin)
//! echo 'new-password' | roya-cli admin set-password -u admin
//! ```
//!
//! # Environment Variables
//!
//! - `ROYA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use std::io::BufRead;

use roya_admin::db::{PgStore, RepositoryError, UserStore};
use roya_admin::services::{AuthError, hash_password};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),

    #[error("Could not read password: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("No user named {0}")]
    UserNotFound(String),
}

/// Replace the password of `username` with one line read from stdin.
///
/// Existing sessions stay valid until they expire or log out.
///
/// # Errors
///
/// Returns `AdminError` if the user does not exist, the password is empty,
/// or the database is unreachable.
pub async fn set_password(username: &str) -> Result<(), AdminError> {
    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("ROYA_DATABASE_URL"))?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }

    tracing::info!("Connecting to database...");
    let pool = roya_admin::db::create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    let password_hash = hash_password(SecretString::from(password.to_owned())).await?;
    if !store.update_password_hash(username, &password_hash).await? {
        return Err(AdminError::UserNotFound(username.to_owned()));
    }

    tracing::info!("Password updated for {}", username);
    Ok(())
}
