//! Roya admin library.
//!
//! Product catalog and shareable baskets behind a single-admin login.
//! The router is built by [`routes::app`] so the binary and the integration
//! tests serve exactly the same application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
