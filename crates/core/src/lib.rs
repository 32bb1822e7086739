//! Roya Core - Shared types library.
//!
//! This crate provides the domain types used by the admin application and CLI:
//! - `admin` - Product/basket administration behind a single-admin login
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Time-based ids, basket line items, price arithmetic and
//!   date display helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
