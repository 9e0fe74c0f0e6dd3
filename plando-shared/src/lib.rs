//! # Plan&Do Shared Library
//!
//! Domain types, persistence, and the authentication/authorization core used
//! by the Plan&Do API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Persistence interfaces with Postgres and in-memory backends
//! - `auth`: Token issuing, password hashing, credentials, and ownership checks
//! - `services`: Task and category services scoped by owner
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Plan&Do shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
