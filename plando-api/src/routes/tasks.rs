/// Task endpoints
///
/// Ownership of the task in the path and of any referenced categories is
/// established by the gates before these handlers run. Create and update
/// receive the already-decoded body from the category gate.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    middleware::auth::AuthUser,
    response::{CreatedResponse, ReadinessResponse, StatusResponse},
};
use axum::{extract::State, Extension, Json};
use plando_shared::models::{
    page::Page,
    task::{TaskDetails, TaskRequest, TaskSummary},
};
use uuid::Uuid;

/// `POST /api/v1/task`
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Extension(request): Extension<TaskRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let id = state.tasks.create(user.user_id, request).await?;
    Ok(Json(CreatedResponse::new(id)))
}

/// `PATCH /api/v1/task/:id`
///
/// Omitting `category_ids` keeps the current categories.
pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
    Extension(request): Extension<TaskRequest>,
) -> ApiResult<Json<StatusResponse>> {
    state.tasks.update(task_id, request).await?;
    Ok(Json(StatusResponse::ok()))
}

/// `GET /api/v1/task/:id`
pub async fn get_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<Json<TaskDetails>> {
    Ok(Json(state.tasks.get(task_id).await?))
}

/// `POST /api/v1/task/all`
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(page): ApiJson<Page>,
) -> ApiResult<Json<Vec<TaskSummary>>> {
    Ok(Json(state.tasks.list(user.user_id, page).await?))
}

/// `DELETE /api/v1/task/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    state.tasks.delete(task_id).await?;
    Ok(Json(StatusResponse::ok()))
}

/// `POST /api/v1/task/:id/readiness`
pub async fn toggle_readiness(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<Json<ReadinessResponse>> {
    let is_done = state.tasks.toggle_done(task_id).await?;
    Ok(Json(ReadinessResponse::new(is_done)))
}
