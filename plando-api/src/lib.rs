//! # Plan&Do API Server Library
//!
//! HTTP surface of the Plan&Do todo service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors with JSON error bodies
//! - `middleware`: Authentication, ownership, deadline and security layers
//! - `response`: Success bodies
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
