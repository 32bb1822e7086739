//! Core types for Roya.
//!
//! This module provides type-safe wrappers for the basket domain.

pub mod calendar;
pub mod id;
pub mod line_item;
pub mod price;

pub use calendar::{DateStyle, DateStyleError, format_timestamp};
pub use id::*;
pub use line_item::{LineItem, NO_DESCRIPTION, UNTITLED, total_price};
pub use price::group_thousands;
