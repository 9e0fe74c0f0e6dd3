/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Every handler and gate
/// returns `Result<T, ApiError>`; every failure renders as
///
/// ```json
/// { "status": "Error", "message": "..." }
/// ```
///
/// 500-class errors are logged with their full cause and answered with a
/// generic message.

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use plando_shared::{
    auth::{credentials::CredentialError, jwt::JwtError, ownership::OwnershipError},
    services::{describe_validation, ServiceError},
};
use serde::{Deserialize, Serialize};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate user name
    Conflict(String),

    /// Internal server error (500); the message is logged, never returned
    InternalError(String),

    /// The request deadline elapsed (500)
    DeadlineExceeded,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "Error"
    pub status: String,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) | ApiError::DeadlineExceeded => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds an internal error carrying the whole `source()` chain
    fn internal(context: &str, err: &dyn std::error::Error) -> Self {
        let mut message = format!("{}: {}", context, err);
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        ApiError::InternalError(message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::DeadlineExceeded => write!(f, "Request deadline exceeded"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            ApiError::DeadlineExceeded => {
                tracing::warn!("Request deadline exceeded");
                "request deadline exceeded".to_string()
            }
        };

        let body = Json(ErrorResponse {
            status: "Error".to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Token failures: unreadable tokens are the client's fault, expiry is an auth failure
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("token expired".to_string()),
            JwtError::Malformed(_) | JwtError::Invalid(_) => {
                ApiError::BadRequest(err.to_string())
            }
            JwtError::CreateError(_) => ApiError::internal("token creation failed", &err),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(msg) => ApiError::BadRequest(msg),
            CredentialError::DuplicateUser(_) => ApiError::Conflict(err.to_string()),
            CredentialError::UserNotFound => ApiError::NotFound(err.to_string()),
            CredentialError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            CredentialError::Hash(_) | CredentialError::Token(_) | CredentialError::Store { .. } => {
                ApiError::internal("credential operation failed", &err)
            }
        }
    }
}

impl From<OwnershipError> for ApiError {
    fn from(err: OwnershipError) -> Self {
        ApiError::internal("ownership check failed", &err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound { .. } | ServiceError::StaleReference(_) => {
                ApiError::NotFound(err.to_string())
            }
            ServiceError::AccountGone => ApiError::Unauthorized(err.to_string()),
            ServiceError::Store { .. } => ApiError::internal("service operation failed", &err),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(describe_validation(&errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
