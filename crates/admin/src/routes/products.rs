//! Product route handlers.
//!
//! Edits and deletes are single conditional store calls; an unknown id is a
//! silent redirect back to the list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use roya_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use super::{IdQuery, message_page, non_blank};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Product};
use crate::state::AppState;

const LIST_PATH: &str = "/admin/list-products";

/// Product form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub title: Option<String>,
}

impl ProductForm {
    fn title(self) -> Option<String> {
        non_blank(self.title)
    }
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/list.html")]
pub struct ProductListTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
    pub products: Vec<Product>,
}

/// New product template.
#[derive(Template, WebTemplate)]
#[template(path = "products/add.html")]
pub struct AddProductTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
}

/// Product edit template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct EditProductTemplate {
    pub admin: CurrentUser,
    pub current_path: &'static str,
    pub product: Product,
}

/// List all products.
#[instrument(skip(admin, state))]
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<ProductListTemplate, AppError> {
    let products = state.store().list_products().await?;

    Ok(ProductListTemplate {
        admin,
        current_path: LIST_PATH,
        products,
    })
}

/// Show the new product form.
pub async fn add_page(RequireAdmin(admin): RequireAdmin) -> AddProductTemplate {
    AddProductTemplate {
        admin,
        current_path: LIST_PATH,
    }
}

/// Create a product. A blank title creates nothing.
#[instrument(skip(_admin, state, form))]
pub async fn add(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect, AppError> {
    if let Some(title) = form.title() {
        let product = Product {
            id: ProductId::generate(),
            title,
        };
        state.store().insert_product(&product).await?;
        tracing::info!(product_id = %product.id, "product created");
    }

    Ok(Redirect::to(LIST_PATH))
}

/// Show the edit form, or a not-found message.
#[instrument(skip(admin, state))]
pub async fn edit_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let product = match query.get::<ProductId>() {
        Some(id) => state.store().find_product(&id).await?,
        None => None,
    };

    let Some(product) = product else {
        return Ok(product_not_found().into_response());
    };

    Ok(EditProductTemplate {
        admin,
        current_path: LIST_PATH,
        product,
    }
    .into_response())
}

/// Rename a product. Unknown ids and blank titles change nothing.
#[instrument(skip(_admin, state, form))]
pub async fn edit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect, AppError> {
    if let (Some(id), Some(title)) = (query.get::<ProductId>(), form.title())
        && state.store().rename_product(&id, &title).await?
    {
        tracing::info!(product_id = %id, "product renamed");
    }

    Ok(Redirect::to(LIST_PATH))
}

/// Delete a product. Unknown ids are a no-op.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Redirect, AppError> {
    if let Some(id) = query.get::<ProductId>()
        && state.store().delete_product(&id).await?
    {
        tracing::info!(product_id = %id, "product deleted");
    }

    Ok(Redirect::to(LIST_PATH))
}

fn product_not_found() -> super::MessageTemplate {
    message_page("Product not found", "No product with this id exists.")
}
