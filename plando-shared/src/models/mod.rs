/// Database models for Plan&Do
///
/// Each model carries its own Postgres CRUD operations as associated
/// functions taking a `&PgPool`. Business rules (validation, ownership)
/// live in `auth` and `services`, never here.
///
/// # Models
///
/// - `user`: User accounts
/// - `category`: Categories owned by a user
/// - `task`: Tasks owned by a user and linked to categories
/// - `page`: 1-based pagination input shared by list endpoints
///
/// # Example
///
/// ```no_run
/// use plando_shared::models::user::{User, CreateUser};
/// use plando_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod page;
pub mod task;
pub mod user;
