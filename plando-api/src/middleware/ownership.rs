/// Ownership gates
///
/// Run after [`require_auth`](super::auth::require_auth) on routes that touch
/// a task or reference categories. Any ownership failure is 403, whether the
/// resource belongs to someone else or does not exist at all.
///
/// | Outcome | Status |
/// |---|---|
/// | no authenticated user | 401 |
/// | body unreadable / not a task request, or malformed task id | 400 |
/// | ownership lookup failed | 500 |
/// | not owned | 403 |

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use plando_shared::models::task::TaskRequest;
use tracing::warn;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::{app::AppState, error::ApiError, extract::ApiPath};

/// Largest task body the category gate will buffer
pub const MAX_BODY_BYTES: usize = 64 * 1024;

fn authenticated(req: &Request) -> Result<AuthUser, ApiError> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized("request is not authenticated".to_string()))
}

/// Checks that every category referenced by a task body belongs to the caller
///
/// The body is decoded exactly once; the decoded [`TaskRequest`] travels on to
/// the handler as a request extension and the handler never re-reads the body.
pub async fn require_category_ownership(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticated(&req)?;

    let (mut parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read request body: {}", e)))?;
    let task: TaskRequest = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("invalid task body: {}", e)))?;

    if !state
        .ownership
        .owns_categories(user.user_id, task.referenced_categories())
        .await?
    {
        warn!(user_id = %user.user_id, "Category ownership check failed");
        return Err(ApiError::Forbidden(
            "one or more categories do not belong to the user".to_string(),
        ));
    }

    parts.extensions.insert(task);
    Ok(next.run(Request::from_parts(parts, Body::empty())).await)
}

/// Checks that the task named by the `:id` path segment belongs to the caller
pub async fn require_task_ownership(
    State(state): State<AppState>,
    ApiPath(params): ApiPath<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticated(&req)?;

    let task_id = params
        .get("id")
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(|| ApiError::BadRequest("invalid task id".to_string()))?;

    if !state.ownership.owns_task(user.user_id, task_id).await? {
        warn!(user_id = %user.user_id, task_id = %task_id, "Task ownership check failed");
        return Err(ApiError::Forbidden(
            "task does not belong to the user".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
