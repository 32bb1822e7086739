//! HTTP middleware for admin.
//!
//! # Layer Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, signed cookie)
//!
//! Authentication is not a layer: handlers take the [`Identity`] or
//! [`RequireAdmin`] extractor, which resolve the session against the store.

pub mod auth;
pub mod session;

pub use auth::{Identity, RequireAdmin};
pub use session::create_session_layer;
