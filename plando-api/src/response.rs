//! Success bodies
//!
//! Mutations answer `{"status":"OK"}`, optionally with the id or flag they
//! produced; reads return the resource itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_OK: &str = "OK";

/// `{"status":"OK"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK.to_string(),
        }
    }
}

/// `{"status":"OK","id":...}` for created resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub status: String,
    pub id: Uuid,
}

impl CreatedResponse {
    pub fn new(id: Uuid) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            id,
        }
    }
}

/// `{"status":"OK","is_done":...}` after a readiness toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub is_done: bool,
}

impl ReadinessResponse {
    pub fn new(is_done: bool) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            is_done,
        }
    }
}
