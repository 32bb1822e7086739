//! Domain models for the admin application.
//!
//! # Collections
//!
//! - [`User`] - Login accounts (in practice a single bootstrap admin)
//! - [`Product`] - Catalog entries offered when composing baskets
//! - [`Basket`] - Shareable baskets with embedded line items

pub mod basket;
pub mod product;
pub mod session;
pub mod user;

pub use basket::Basket;
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
