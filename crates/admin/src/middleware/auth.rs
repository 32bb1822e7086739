//! Authentication extractors for admin.
//!
//! The session stores only a username. Every request re-reads the user from
//! the store, so a changed admin flag or a deleted account takes effect on
//! the next request rather than the next login.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::db::Store;
use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Extractor that resolves the optional identity of the caller.
///
/// Never rejects for a missing login; only store failures are errors.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Identity(user): Identity) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct Identity(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let user = resolve_identity(session, state.store()).await?;
        Ok(Self(user))
    }
}

/// Extractor that requires a logged-in admin.
///
/// Anonymous callers are redirected to `/login`, non-admins to `/`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdmin(pub CurrentUser);

/// Rejection from [`RequireAdmin`].
#[derive(Debug)]
pub enum AdminRejection {
    /// No logged-in user.
    RedirectToLogin,
    /// Logged in, but not an admin.
    RedirectToHome,
    /// Store or session failure.
    Error(AppError),
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectToHome => Redirect::to("/").into_response(),
            Self::Error(e) => e.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(user) = Identity::from_request_parts(parts, state)
            .await
            .map_err(AdminRejection::Error)?;

        let user = user.ok_or(AdminRejection::RedirectToLogin)?;
        if !user.is_admin {
            return Err(AdminRejection::RedirectToHome);
        }

        set_sentry_user(&user.username);
        Ok(Self(user))
    }
}

/// Map the session's username back to a user record.
///
/// A session naming a user that no longer exists resolves to `None`.
///
/// # Errors
///
/// Returns an error if the session or the store cannot be read.
pub async fn resolve_identity(
    session: &Session,
    store: &dyn Store,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(username) = session.get::<String>(session_keys::USERNAME).await? else {
        return Ok(None);
    };

    let user = store.find_user(&username).await?;
    Ok(user.as_ref().map(CurrentUser::from))
}

/// Bind the session to `user`, issuing a fresh session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn log_in(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USERNAME, &user.username).await
}

/// Destroy the session. Flushing an empty session is a no-op.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Store a one-shot message for the next render.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, message).await
}

/// Remove and return the pending one-shot message, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_flash(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(session_keys::FLASH).await
}
