//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user with the given username.
    #[error("user not found")]
    UserNotFound,

    /// Password does not match the stored hash.
    #[error("incorrect password")]
    BadPassword,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Message shown to the person at the login form.
    ///
    /// Returns `None` for server faults, which are not surfaced as messages.
    #[must_use]
    pub const fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::UserNotFound => Some("User not found."),
            Self::BadPassword => Some("Incorrect password."),
            Self::PasswordHash | Self::Repository(_) => None,
        }
    }
}
