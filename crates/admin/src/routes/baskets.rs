//! Basket route handlers.
//!
//! Basket forms submit line items as parallel repeated fields
//! (`item_title`, `item_color`, `item_price`, `item_count`) which are zipped
//! by position into rows. Only complete rows become line items; a basket
//! with none is rejected without writing anything.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use roya_core::{BasketId, DateStyle, LineItem, format_timestamp};
use rust_decimal::Decimal;
use tracing::instrument;

use super::{IdQuery, MessageTemplate, message_page, non_blank};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{Basket, CurrentUser, Product};
use crate::state::AppState;

const LIST_PATH: &str = "/admin/list-baskets";

/// Blank rows offered on the new basket form.
const ADD_FORM_BLANK_ROWS: usize = 5;

/// Blank rows appended after the existing items on the edit form.
const EDIT_FORM_BLANK_ROWS: usize = 3;

// =============================================================================
// Form Types
// =============================================================================

/// One submitted line item row, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRow {
    pub title: String,
    pub color: String,
    pub price: String,
    pub count: String,
}

impl ItemRow {
    fn from_item(item: &LineItem) -> Self {
        Self {
            title: item.title.clone(),
            color: item.color.clone(),
            price: item.price.normalize().to_string(),
            count: item.count.to_string(),
        }
    }
}

/// Basket form data.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BasketForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rows: Vec<ItemRow>,
}

impl BasketForm {
    /// Collect a basket form from the raw ordered field list.
    ///
    /// Item columns shorter than the longest one are padded with blanks, so
    /// a row missing any field is simply incomplete.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut title = None;
        let mut description = None;
        let (mut titles, mut colors, mut prices, mut counts) =
            (Vec::new(), Vec::new(), Vec::new(), Vec::new());

        for (key, value) in pairs {
            match key.as_str() {
                "title" => title = Some(value),
                "description" => description = Some(value),
                "item_title" => titles.push(value),
                "item_color" => colors.push(value),
                "item_price" => prices.push(value),
                "item_count" => counts.push(value),
                _ => {}
            }
        }

        let len = titles
            .len()
            .max(colors.len())
            .max(prices.len())
            .max(counts.len());
        let mut columns = [titles, colors, prices, counts].map(Vec::into_iter);
        let rows = (0..len)
            .map(|_| {
                let [t, c, p, n] = &mut columns;
                ItemRow {
                    title: t.next().unwrap_or_default(),
                    color: c.next().unwrap_or_default(),
                    price: p.next().unwrap_or_default(),
                    count: n.next().unwrap_or_default(),
                }
            })
            .collect();

        Self {
            title: non_blank(title),
            description: non_blank(description),
            rows,
        }
    }

    /// The well-formed rows, or the reason the basket cannot be saved.
    ///
    /// # Errors
    ///
    /// Fails when no row is well-formed or the rows' total overflows.
    pub fn checked_line_items(&self) -> Result<Vec<LineItem>, &'static str> {
        let line_items = self.line_items();
        if line_items.is_empty() {
            return Err("A basket needs at least one complete product row.");
        }
        if roya_core::total_price(&line_items).is_none() {
            return Err("The basket total is too large.");
        }
        Ok(line_items)
    }

    /// The well-formed rows, in submission order.
    #[must_use]
    pub fn line_items(&self) -> Vec<LineItem> {
        self.rows
            .iter()
            .filter_map(|row| LineItem::from_parts(&row.title, &row.color, &row.price, &row.count))
            .collect()
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Basket prepared for display.
#[derive(Debug, Clone)]
pub struct BasketView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time: String,
    pub line_items: Vec<LineItem>,
    /// `None` when the total does not fit in a `Decimal`.
    pub total: Option<Decimal>,
}

impl BasketView {
    #[must_use]
    pub fn new(basket: Basket, date_style: DateStyle) -> Self {
        Self {
            id: basket.id.to_string(),
            time: format_timestamp(basket.time, date_style),
            total: basket.total_price(),
            title: basket.title,
            description: basket.description,
            line_items: basket.line_items,
        }
    }
}

/// Basket list template.
#[derive(Template, WebTemplate)]
#[template(path = "baskets/list.html")]
pub struct BasketListTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
    pub baskets: Vec<BasketView>,
}

/// New basket template.
#[derive(Template, WebTemplate)]
#[template(path = "baskets/add.html")]
pub struct AddBasketTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
    pub products: Vec<Product>,
    pub rows: Vec<ItemRow>,
}

/// Basket edit template.
#[derive(Template, WebTemplate)]
#[template(path = "baskets/edit.html")]
pub struct EditBasketTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
    pub products: Vec<Product>,
    pub basket: BasketView,
    pub rows: Vec<ItemRow>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all baskets.
#[instrument(skip(admin, state))]
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<BasketListTemplate, AppError> {
    let date_style = state.config().date_style;
    let baskets = state
        .store()
        .list_baskets()
        .await?
        .into_iter()
        .map(|basket| BasketView::new(basket, date_style))
        .collect();

    Ok(BasketListTemplate {
        admin,
        current_path: LIST_PATH,
        baskets,
    })
}

/// Show the new basket form with the product catalog.
#[instrument(skip(admin, state))]
pub async fn add_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<AddBasketTemplate, AppError> {
    let products = state.store().list_products().await?;

    Ok(AddBasketTemplate {
        admin,
        current_path: LIST_PATH,
        products,
        rows: vec![ItemRow::default(); ADD_FORM_BLANK_ROWS],
    })
}

/// Create a basket from the submitted rows.
#[instrument(skip_all)]
pub async fn add(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = BasketForm::from_pairs(pairs);
    let line_items = match form.checked_line_items() {
        Ok(line_items) => line_items,
        Err(reason) => return Ok(message_page("Could not create basket", reason).into_response()),
    };

    let basket = Basket::stamped(BasketId::generate(), form.title, form.description, line_items);
    state.store().insert_basket(&basket).await?;
    tracing::info!(basket_id = %basket.id, items = basket.line_items.len(), "basket created");

    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Show the edit form with the current items and total, or a not-found
/// message.
#[instrument(skip(admin, state))]
pub async fn edit_page(
    RequireAdmin(admin): RequireAdmin,
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

    let products = state.store().list_products().await?;
    let rows = basket
        .line_items
        .iter()
        .map(ItemRow::from_item)
        .chain(std::iter::repeat_n(ItemRow::default(), EDIT_FORM_BLANK_ROWS))
        .collect();

    Ok(EditBasketTemplate {
        admin,
        current_path: LIST_PATH,
        products,
        basket: BasketView::new(basket, state.config().date_style),
        rows,
    }
    .into_response())
}

/// Overwrite a basket's title, description, time and items.
///
/// Existence is checked before the rows are validated: an unknown id
/// redirects to the list whatever was submitted. The check and the write
/// are separate store calls, so a concurrent delete in between turns the
/// write into a no-op.
#[instrument(skip_all)]
pub async fn edit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let Some(id) = query.get::<BasketId>() else {
        return Ok(Redirect::to(LIST_PATH).into_response());
    };
    if state.store().find_basket(&id).await?.is_none() {
        return Ok(Redirect::to(LIST_PATH).into_response());
    }

    let form = BasketForm::from_pairs(pairs);
    let line_items = match form.checked_line_items() {
        Ok(line_items) => line_items,
        Err(reason) => return Ok(message_page("Could not update basket", reason).into_response()),
    };

    let basket = Basket::stamped(id, form.title, form.description, line_items);
    if state.store().update_basket(&basket).await? {
        tracing::info!(basket_id = %basket.id, items = basket.line_items.len(), "basket updated");
    }

    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Delete a basket. Unknown ids are a no-op.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Redirect, AppError> {
    if let Some(id) = query.get::<BasketId>()
        && state.store().delete_basket(&id).await?
    {
        tracing::info!(basket_id = %id, "basket deleted");
    }

    Ok(Redirect::to(LIST_PATH))
}

/// Message shown when a basket id does not resolve.
pub(super) fn basket_not_found() -> MessageTemplate {
    message_page("Basket not found", "No basket with this id exists.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_rows_zip_by_position() {
        let form = BasketForm::from_pairs(pairs(&[
            ("title", "Nowruz"),
            ("item_title", "Vase"),
            ("item_color", "Blue"),
            ("item_price", "1000"),
            ("item_count", "2"),
            ("item_title", "Plate"),
            ("item_color", "White"),
            ("item_price", "500"),
            ("item_count", "1"),
        ]));

        assert_eq!(form.title.as_deref(), Some("Nowruz"));
        assert_eq!(form.description, None);
        assert_eq!(form.rows.len(), 2);

        let items = form.line_items();
        assert_eq!(items.len(), 2);
        assert_eq!(roya_core::total_price(&items), Some(Decimal::from(2500)));
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let form = BasketForm::from_pairs(pairs(&[
            ("item_title", "Vase"),
            ("item_color", ""),
            ("item_price", "1000"),
            ("item_count", "2"),
            ("item_title", "Plate"),
            ("item_color", "White"),
            ("item_price", "abc"),
            ("item_count", "1"),
            ("item_title", "Cup"),
            ("item_color", "Green"),
            ("item_price", "250"),
            ("item_count", "0"),
        ]));

        assert_eq!(form.rows.len(), 3);
        assert!(form.line_items().is_empty());
    }

    #[test]
    fn test_ragged_columns_pad_with_blanks() {
        let form = BasketForm::from_pairs(pairs(&[
            ("item_title", "Vase"),
            ("item_title", "Plate"),
            ("item_color", "Blue"),
            ("item_price", "1000"),
            ("item_count", "2"),
        ]));

        assert_eq!(form.rows.len(), 2);
        assert_eq!(form.rows.get(1).map(|r| r.color.as_str()), Some(""));
        assert_eq!(form.line_items().len(), 1);
    }

    #[test]
    fn test_blank_title_and_description_are_none() {
        let form = BasketForm::from_pairs(pairs(&[("title", "  "), ("description", "")]));
        assert_eq!(form, BasketForm::default());
    }

    #[test]
    fn test_view_formats_time_and_total() {
        let basket = Basket {
            id: BasketId::from("1710892800000".to_string()),
            title: "Nowruz".to_string(),
            description: "Gift set".to_string(),
            time: 1_710_892_800_000,
            line_items: vec![LineItem {
                title: "Vase".to_string(),
                color: "Blue".to_string(),
                price: Decimal::from(1500),
                count: 3,
            }],
        };

        let view = BasketView::new(basket.clone(), DateStyle::Jalali);
        assert_eq!(view.time, "1403/01/01 00:00");
        assert_eq!(view.total, Some(Decimal::from(4500)));

        let view = BasketView::new(basket, DateStyle::Gregorian);
        assert_eq!(view.time, "2024/03/20 00:00");
    }

    #[test]
    fn test_edit_rows_round_trip_existing_items() {
        let item = LineItem {
            title: "Vase".to_string(),
            color: "Blue".to_string(),
            price: "1500.00".parse().unwrap_or_default(),
            count: 3,
        };
        let row = ItemRow::from_item(&item);
        assert_eq!(row.price, "1500");
        assert_eq!(
            LineItem::from_parts(&row.title, &row.color, &row.price, &row.count),
            Some(item)
        );
    }

    #[test]
    fn test_checked_line_items_rejects_empty_basket() {
        let form = BasketForm::from_pairs(pairs(&[("item_title", "Vase")]));
        assert!(form.checked_line_items().is_err());
    }

    #[test]
    fn test_checked_line_items_rejects_overflowing_total() {
        let form = BasketForm::from_pairs(pairs(&[
            ("item_title", "Vase"),
            ("item_color", "Blue"),
            ("item_price", "50000000000000000000000000000"),
            ("item_count", "1"),
            ("item_title", "Plate"),
            ("item_color", "White"),
            ("item_price", "50000000000000000000000000000"),
            ("item_count", "1"),
        ]));

        assert_eq!(form.line_items().len(), 2);
        assert_eq!(
            form.checked_line_items(),
            Err("The basket total is too large.")
        );
    }
}
