/// Authentication gate
///
/// Reads the `Authorization` header, validates the token and attaches the
/// caller's identity to the request as an [`AuthUser`] extension. Handlers
/// take `AuthUser` as an extractor, which rejects with 401 if the gate did
/// not run.
///
/// | Outcome | Status |
/// |---|---|
/// | header missing or empty | 401 |
/// | token malformed or claims invalid | 400 |
/// | token expired | 401 |

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{app::AppState, error::ApiError};

/// Identity of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("request is not authenticated".to_string()))
    }
}

/// Extracts the token from `Authorization`, with or without a `Bearer ` prefix
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| {
            ApiError::BadRequest("authorization header is not valid text".to_string())
        })?,
        None => "",
    };

    let value = value.trim();
    let token = match value.strip_prefix("Bearer") {
        Some("") => "",
        Some(rest) if rest.starts_with(' ') => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        return Err(ApiError::Unauthorized(
            "missing authorization token".to_string(),
        ));
    }
    Ok(token)
}

/// Rejects requests without a valid token; otherwise inserts [`AuthUser`]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;
    let user_id = state.tokens.validate(token)?;

    debug!(user_id = %user_id, "Request authenticated");
    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}
