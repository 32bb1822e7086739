//! Session-related types for authentication.
//!
//! The session itself stores only the username; [`CurrentUser`] is rebuilt
//! from the store on every request.

use super::user::User;

/// Request-scoped identity resolved from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in username.
    pub const USERNAME: &str = "username";

    /// Key for a one-shot message shown on the next render.
    pub const FLASH: &str = "flash";
}
