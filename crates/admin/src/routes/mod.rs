//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (store ping)
//!
//! # Entry
//! GET  /                        - Bootstrap the first admin, then redirect by role
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Username/password login
//! GET  /logout                  - Destroy session
//!
//! # Admin (admin only)
//! GET  /admin                   - Dashboard with counts
//! GET  /admin/list-products     - Product listing
//! GET  /admin/add-product       - Product form
//! POST /admin/add-product       - Create product
//! GET  /admin/edit-product?id=  - Product edit form
//! POST /admin/edit-product?id=  - Rename product
//! GET  /admin/delete-product?id=- Delete product
//! GET  /admin/list-baskets      - Basket listing
//! GET  /admin/add-basket        - Basket form
//! POST /admin/add-basket        - Create basket
//! GET  /admin/edit-basket?id=   - Basket edit form
//! POST /admin/edit-basket?id=   - Overwrite basket
//! GET  /admin/delete-basket?id= - Delete basket
//! GET  /admin/change-password   - Password form
//! POST /admin/change-password   - Rotate password and log out
//!
//! # Public
//! GET  /view-basket?id=         - Read-only basket view
//! GET  /404                     - Not-found message
//! *                             - Redirect to /404
//! ```

pub mod account;
pub mod auth;
pub mod baskets;
pub mod dashboard;
pub mod home;
pub mod products;
pub mod public;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::get,
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::filters;
use crate::middleware::create_session_layer;
use crate::state::AppState;

// =============================================================================
// Shared Types
// =============================================================================

/// `?id=` query parameter used by every edit, delete and view route.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The id, or `None` when missing or blank.
    ///
    /// A blank id behaves exactly like an unknown one.
    #[must_use]
    pub fn get<T: From<String>>(&self) -> Option<T> {
        non_blank(self.id.clone()).map(T::from)
    }
}

/// Normalize a submitted field: trim it and map blank input to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Generic informational page.
///
/// Every "not found", validation failure and confirmation is rendered with
/// this template, always with status 200.
#[derive(Template, WebTemplate)]
#[template(path = "msg.html")]
pub struct MessageTemplate {
    pub title: String,
    pub message: String,
}

/// Build an informational page.
#[must_use]
pub fn message_page(title: &str, message: &str) -> MessageTemplate {
    MessageTemplate {
        title: title.to_owned(),
        message: message.to_owned(),
    }
}

// =============================================================================
// Router
// =============================================================================

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/list-products", get(products::list))
        .route(
            "/add-product",
            get(products::add_page).post(products::add),
        )
        .route(
            "/edit-product",
            get(products::edit_page).post(products::edit),
        )
        .route("/delete-product", get(products::delete))
        .route("/list-baskets", get(baskets::list))
        .route("/add-basket", get(baskets::add_page).post(baskets::add))
        .route(
            "/edit-basket",
            get(baskets::edit_page).post(baskets::edit),
        )
        .route("/delete-basket", get(baskets::delete))
        .route(
            "/change-password",
            get(account::change_password_page).post(account::change_password),
        )
}

/// Create all routes for the admin application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .nest("/admin", admin_routes())
        .route("/view-basket", get(public::view_basket))
        .route("/404", get(public::not_found))
}

/// Build the complete application around a session store.
///
/// Sentry layers are added by the binary on top of this router.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, &state);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/admin/static"))
        .fallback(fallback)
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Any unmatched path lands on the not-found page.
async fn fallback() -> Redirect {
    Redirect::to("/404")
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use roya_core::ProductId;

    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(String::new())), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" Cup ".to_string())), Some("Cup".to_string()));
    }

    #[test]
    fn test_blank_id_is_missing() {
        let query = IdQuery {
            id: Some("  ".to_string()),
        };
        assert_eq!(query.get::<ProductId>(), None);

        let query = IdQuery {
            id: Some("1710892800000".to_string()),
        };
        assert_eq!(
            query.get::<ProductId>().as_ref().map(ProductId::as_str),
            Some("1710892800000")
        );
    }
}
