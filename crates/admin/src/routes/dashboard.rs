//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct DashboardTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
    pub product_count: u64,
    pub basket_count: u64,
}

/// Dashboard page handler.
#[instrument(skip(admin, state))]
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<DashboardTemplate, AppError> {
    let store = state.store();
    let (product_count, basket_count) =
        tokio::try_join!(store.count_products(), store.count_baskets())?;

    Ok(DashboardTemplate {
        admin,
        current_path: "/admin",
        product_count,
        basket_count,
    })
}
