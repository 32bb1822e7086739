//! Authentication route handlers.
//!
//! Username/password login against the user store. The rejection reason is
//! carried to the login form as a one-shot flash message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::middleware::Identity;
use crate::middleware::auth::{log_in, log_out, set_flash, take_flash};
use crate::services::AuthService;
use crate::state::AppState;

/// Login form data.
///
/// Missing fields deserialize as empty and fail verification normally.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<String>,
}

/// Display the login page, or send a logged-in caller home.
pub async fn login_page(Identity(user): Identity, session: Session) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let flash = take_flash(&session).await?;
    Ok(LoginTemplate { flash }.into_response())
}

/// Handle login form submission.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let password = SecretString::from(form.password);

    match AuthService::new(state.store())
        .verify(&form.username, password)
        .await
    {
        Ok(user) => {
            log_in(&session, &user).await?;
            tracing::info!("login succeeded");
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            let Some(message) = e.user_message() else {
                return Err(e.into());
            };
            tracing::warn!(reason = %e, "login rejected");
            set_flash(&session, message).await?;
            Ok(Redirect::to("/login"))
        }
    }
}

/// Log out and return to the login page.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    log_out(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/login"))
}
