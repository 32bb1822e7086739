//! Product domain types.

use roya_core::ProductId;

/// A catalog product.
///
/// Baskets copy a product's title into their own line items, so renaming or
/// deleting a product never touches existing baskets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
}
