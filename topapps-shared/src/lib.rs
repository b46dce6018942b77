//! # Top Apps Shared Library
//!
//! Types and queries behind the "Top Apps" dashboard, shared by the API
//! server and the terminal client.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and embedded migrations
//! - `models`: apps, memberships and transactions
//! - `pagination`: validated page windows and the response envelope
//! - `apps`: filters, counts, listings and per-app stats
//! - `auth`: JWT validation for member and owner listings

pub mod apps;
pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
