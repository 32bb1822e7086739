//! Routes that need no login.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use roya_core::BasketId;
use tracing::instrument;

use super::baskets::{BasketView, basket_not_found};
use super::{IdQuery, MessageTemplate, message_page};
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Public basket template.
#[derive(Template, WebTemplate)]
#[template(path = "view_basket.html")]
pub struct ViewBasketTemplate {
    pub basket: BasketView,
}

/// Read-only basket view. Anyone holding the id may see the basket.
#[instrument(skip(state))]
pub async fn view_basket(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let basket = match query.get::<BasketId>() {
        Some(id) => state.store().find_basket(&id).await?,
        None => None,
    };

    let Some(basket) = basket else {
        return Ok(basket_not_found().into_response());
    };

    Ok(ViewBasketTemplate {
        basket: BasketView::new(basket, state.config().date_style),
    }
    .into_response())
}

/// Static not-found page.
pub async fn not_found() -> MessageTemplate {
    message_page("Page not found", "There is no page at this address.")
}
