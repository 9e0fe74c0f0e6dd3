/// Sign-up, sign-in and account removal
///
/// The credential service is the only place plaintext passwords are handled.
/// They are hashed with Argon2id before anything reaches the store and are
/// never logged.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chrono::Duration;
/// use plando_shared::auth::credentials::{CredentialService, Credentials};
/// use plando_shared::auth::jwt::TokenService;
/// use plando_shared::store::memory::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("a-secret-of-at-least-32-characters!", Duration::hours(1));
/// let credentials = CredentialService::new(Arc::new(MemoryStore::new()), tokens);
///
/// let login = Credentials::new("alice", "hunter2");
/// credentials.register(&login).await?;
/// let token = credentials.authenticate(&login).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::jwt::{JwtError, TokenService};
use super::password::{hash_password, verify_password, PasswordError};
use crate::models::user::CreateUser;
use crate::services::describe_validation;
use crate::store::{StoreError, UserStore};

/// Name/password pair submitted to sign-up and sign-in
#[derive(Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Empty or otherwise unacceptable input; nothing was written
    #[error("{0}")]
    Validation(String),

    /// The name is already registered
    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("user not found")]
    UserNotFound,

    /// Password did not verify
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed")]
    Hash(#[from] PasswordError),

    #[error("token issuing failed")]
    Token(#[from] JwtError),

    #[error("{op} failed")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl CredentialError {
    fn store(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| CredentialError::Store { op, source }
    }
}

/// Registers users and exchanges valid credentials for tokens
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Creates a user with a hashed password
    ///
    /// # Errors
    ///
    /// - `Validation` if name or password is empty
    /// - `DuplicateUser` if the name is taken
    pub async fn register(&self, credentials: &Credentials) -> Result<Uuid, CredentialError> {
        credentials
            .validate()
            .map_err(|e| CredentialError::Validation(describe_validation(&e)))?;

        let password_hash = hash_password(&credentials.password)?;

        let user = self
            .users
            .insert_user(CreateUser {
                name: credentials.name.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    CredentialError::DuplicateUser(credentials.name.clone())
                }
                other => CredentialError::Store {
                    op: "insert user",
                    source: other,
                },
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user.id)
    }

    /// Verifies a name/password pair and issues a token
    ///
    /// # Errors
    ///
    /// - `Validation` if name or password is empty
    /// - `UserNotFound` for unknown names
    /// - `InvalidCredentials` if the password does not match
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, CredentialError> {
        credentials
            .validate()
            .map_err(|e| CredentialError::Validation(describe_validation(&e)))?;

        let user = self
            .users
            .find_user_by_name(&credentials.name)
            .await
            .map_err(CredentialError::store("find user"))?
            .ok_or(CredentialError::UserNotFound)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(CredentialError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "User signed in");
        Ok(token)
    }

    /// Deletes the account and everything it owns
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), CredentialError> {
        let deleted = self
            .users
            .delete_user(user_id)
            .await
            .map_err(CredentialError::store("delete user"))?;

        if !deleted {
            return Err(CredentialError::UserNotFound);
        }

        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
