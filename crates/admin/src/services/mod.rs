//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Username/password verification and password rotation
//! - `bootstrap` - Creation of the initial admin account

pub mod auth;
pub mod bootstrap;

pub use auth::{AuthError, AuthService, hash_password};
pub use bootstrap::ensure_admin;
