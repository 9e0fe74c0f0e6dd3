/// Authentication and authorization core
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Token issuing and validation ([`jwt::TokenService`])
/// - [`credentials`]: Sign-up, sign-in and account removal ([`credentials::CredentialService`])
/// - [`ownership`]: Task and category ownership checks ([`ownership::OwnershipChecker`])
///
/// # Example
///
/// ```
/// use plando_shared::auth::password::{hash_password, verify_password};
/// use plando_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "alice");
/// let token = create_token(&claims, "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod ownership;
pub mod password;
