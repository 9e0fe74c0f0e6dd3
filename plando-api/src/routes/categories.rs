/// Category endpoints
///
/// Categories are always scoped to the caller: deleting someone else's
/// category looks exactly like deleting a missing one (404).

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    middleware::auth::AuthUser,
    response::{CreatedResponse, StatusResponse},
};
use axum::{extract::State, Json};
use plando_shared::models::{
    category::{Category, CategoryRequest},
    page::Page,
};
use uuid::Uuid;

/// `POST /api/v1/category`
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CategoryRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let id = state.categories.create(user.user_id, request).await?;
    Ok(Json(CreatedResponse::new(id)))
}

/// `DELETE /api/v1/category/:id`
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(category_id): ApiPath<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    state.categories.delete(user.user_id, category_id).await?;
    Ok(Json(StatusResponse::ok()))
}

/// `POST /api/v1/category/all`
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(page): ApiJson<Page>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list(user.user_id, page).await?))
}
