//! Session layer configuration.
//!
//! Signed `roya_session` cookie, `HttpOnly`, `SameSite=Lax`, 24 hour
//! inactivity expiry. The backing store is chosen by the caller:
//! `PostgresStore` in production, `MemoryStore` in tests.

use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore, cookie::SameSite, service::SignedCookie,
};

use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "roya_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer around `store`.
///
/// The cookie is marked `Secure` when the configured base URL is https.
#[must_use]
pub fn create_session_layer<S>(
    store: S,
    state: &AppState,
) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(state.config().is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(state.session_key().clone())
}
