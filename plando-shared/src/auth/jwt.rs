/// JWT token issuing and validation
///
/// Tokens are signed with HS256 using a process-wide secret and carry the
/// user's id (`sub`) and display name. Nothing is persisted server-side.
///
/// # Validation Failures
///
/// Failures are classified so the HTTP layer can tell client bugs from
/// lifecycle events:
///
/// - [`JwtError::Malformed`]: cannot be decoded or the signature does not verify
/// - [`JwtError::Expired`]: signature is fine but `exp` has passed
/// - [`JwtError::Invalid`]: any other claim check failed (issuer, `nbf`, ...)
///
/// # Example
///
/// ```
/// use plando_shared::auth::jwt::{JwtError, TokenService};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), JwtError> {
/// let tokens = TokenService::new("your-secret-key-at-least-32-bytes", Duration::hours(24));
/// let user_id = Uuid::new_v4();
///
/// let token = tokens.issue_for(user_id, "alice")?;
/// assert_eq!(tokens.validate(&token)?, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::user::User;

/// Issuer written into and required from every token
pub const ISSUER: &str = "plando";

/// Default validity window of an issued token
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token could not be parsed or its signature did not verify
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token decoded but a claim failed validation
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims structure
///
/// - `sub`: Subject (user ID)
/// - `name`: User display name at issuance
/// - `iss`: Issuer (always "plando")
/// - `iat` / `nbf` / `exp`: Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// User display name
    pub name: String,

    /// Issuer - Always "plando"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims valid for [`DEFAULT_TOKEN_TTL_HOURS`]
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self::with_expiration(user_id, name, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// Creates claims with a custom validity window
    ///
    /// A negative duration produces claims that are already expired.
    ///
    /// # Example
    ///
    /// ```
    /// use plando_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_expiration(Uuid::new_v4(), "bob", Duration::hours(1));
    /// assert_eq!(claims.exp - claims.iat, 3600);
    /// ```
    pub fn with_expiration(user_id: Uuid, name: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        // nbf must not be later than exp, otherwise an expired token reads as immature
        let not_before = now.min(expiration);

        Self {
            sub: user_id,
            name: name.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: not_before.timestamp(),
        }
    }
}

/// Signs claims into a compact HS256 token
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the HS256 signature, `exp`, `nbf` and the issuer.
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` has passed
/// - `JwtError::Invalid` when issuer, `nbf` or a required claim is wrong
/// - `JwtError::Malformed` for everything else (encoding, JSON, signature, algorithm)
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::MissingRequiredClaim(_) => JwtError::Invalid(e.to_string()),
        _ => JwtError::Malformed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Issues and validates tokens with the configured secret
///
/// Cloning is cheap; the secret is shared.
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<str>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    /// Creates a token service signing with `secret`, issuing tokens valid for `ttl`
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: Arc::from(secret.into()),
            ttl,
        }
    }

    /// Issues a token for a stored user
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        self.issue_for(user.id, &user.name)
    }

    /// Issues a token for a user id and name
    pub fn issue_for(&self, user_id: Uuid, name: &str) -> Result<String, JwtError> {
        let claims = Claims::with_expiration(user_id, name, self.ttl);
        create_token(&claims, &self.secret)
    }

    /// Validates a token and returns the user id it was issued for
    pub fn validate(&self, token: &str) -> Result<Uuid, JwtError> {
        validate_token(token, &self.secret).map(|claims| claims.sub)
    }
}
