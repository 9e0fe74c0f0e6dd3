/// Account endpoints
///
/// - `POST /api/v1/sign-up` - register a name/password pair
/// - `POST /api/v1/sign-in` - exchange credentials for a token
/// - `DELETE /api/v1/user` - delete the caller's account and everything it owns

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::StatusResponse,
};
use axum::{extract::State, Json};
use plando_shared::auth::credentials::Credentials;
use serde::{Deserialize, Serialize};

/// Sign-in response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Registers a user
///
/// # Errors
///
/// - 400 if name or password is empty
/// - 409 if the name is taken
pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResult<Json<StatusResponse>> {
    state.credentials.register(&credentials).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Issues a token for valid credentials
///
/// # Errors
///
/// - 400 if name or password is empty
/// - 404 for an unknown name
/// - 401 for a wrong password
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.credentials.authenticate(&credentials).await?;
    Ok(Json(TokenResponse { token }))
}

/// Deletes the caller's account
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<StatusResponse>> {
    state.credentials.delete_account(user.user_id).await?;
    Ok(Json(StatusResponse::ok()))
}
