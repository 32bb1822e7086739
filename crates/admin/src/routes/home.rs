//! Entry point route.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::message_page;
use crate::error::AppError;
use crate::middleware::auth::resolve_identity;
use crate::services::ensure_admin;
use crate::state::AppState;

/// `GET /`: create the first admin if there are no users, then route the
/// caller by role.
///
/// Bootstrap runs before any session check. After creating the admin the
/// handler redirects to itself so the decision is made against the new
/// state.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    if ensure_admin(state.store(), &state.config().bootstrap).await? {
        return Ok(Redirect::to("/").into_response());
    }

    let response = match resolve_identity(&session, state.store()).await? {
        None => Redirect::to("/login").into_response(),
        Some(user) if user.is_admin => Redirect::to("/admin").into_response(),
        Some(_) => message_page(
            "Nothing here yet",
            "No user panel is available for this account.",
        )
        .into_response(),
    };

    Ok(response)
}
