//! Password change.
//!
//! A successful change ends the session; the confirmation page asks the
//! admin to log in again with the new password.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::message_page;
use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::middleware::auth::log_out;
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

const CHANGE_PASSWORD_FAILED: &str = "Could not change password";

/// Change password form data.
#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub oldpassword: Option<String>,
    pub newpassword: Option<String>,
}

impl ChangePasswordForm {
    /// Both passwords exactly as typed, if neither is empty.
    fn passwords(self) -> Option<(SecretString, SecretString)> {
        let present = |p: Option<String>| p.filter(|p| !p.is_empty()).map(SecretString::from);
        Some((present(self.oldpassword)?, present(self.newpassword)?))
    }
}

/// Change password template.
#[derive(Template, WebTemplate)]
#[template(path = "account/change_password.html")]
pub struct ChangePasswordTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
}

/// Show the change password form.
pub async fn change_password_page(RequireAdmin(admin): RequireAdmin) -> ChangePasswordTemplate {
    ChangePasswordTemplate {
        admin,
        current_path: "/admin/change-password",
    }
}

/// Verify the old password, store the new one and log out.
#[instrument(skip_all, fields(username = %admin.username))]
pub async fn change_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, AppError> {
    let Some((old_password, new_password)) = form.passwords() else {
        return Ok(message_page(
            CHANGE_PASSWORD_FAILED,
            "Both the old and the new password are required.",
        )
        .into_response());
    };

    let result = AuthService::new(state.store())
        .change_password(&admin.username, old_password, new_password)
        .await;

    match result {
        Ok(()) => {}
        Err(AuthError::BadPassword) => {
            tracing::warn!("password change rejected");
            return Ok(
                message_page(CHANGE_PASSWORD_FAILED, "The old password is incorrect.")
                    .into_response(),
            );
        }
        Err(e) => return Err(e.into()),
    }

    log_out(&session).await?;
    clear_sentry_user();

    Ok(message_page(
        "Password changed",
        "Your password was changed. Log in again with the new password to continue.",
    )
    .into_response())
}
