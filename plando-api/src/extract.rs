//! Extractors whose rejections render as [`ApiError`] bodies
//!
//! axum's own `Json` and `Path` reject with plain-text responses; these wrap
//! them so malformed input gets the same `{"status":"Error",...}` body as
//! every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
