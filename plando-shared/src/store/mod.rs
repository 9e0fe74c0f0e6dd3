/// Persistence interfaces
///
/// Services depend on these traits rather than on a concrete database, so the
/// same business logic runs against Postgres in production and against the
/// in-memory backend in tests.
///
/// # Backends
///
/// - [`postgres::PgStore`]: sqlx/Postgres, delegating to the `models` queries
/// - [`memory::MemoryStore`]: process-local maps behind an async `RwLock`
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use plando_shared::store::{memory::MemoryStore, Store};
///
/// # async fn example() -> Result<(), plando_shared::store::StoreError> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::category::{Category, NewCategory};
use crate::models::page::Page;
use crate::models::task::{NewTask, Task, TaskChanges, TaskDetails, TaskSummary};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// Foreign key from `tasks.user_id` to `users`
pub const TASKS_USER_FKEY: &str = "tasks_user_id_fkey";

/// Foreign key from `categories.user_id` to `users`
pub const CATEGORIES_USER_FKEY: &str = "categories_user_id_fkey";

/// Foreign key from `task_category.category_id` to `categories`
pub const TASK_CATEGORY_CATEGORY_FKEY: &str = "task_category_category_id_fkey";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; holds the constraint name
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist; holds the constraint name
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();

            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }

        StoreError::Database(err)
    }
}

/// User accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; a taken name yields [`StoreError::UniqueViolation`]
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// Deletes a user along with their tasks and categories
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Ownership lookups used by the authorization gates
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// True iff the task exists and belongs to `user_id`
    async fn task_owned_by(&self, task_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;

    /// True iff every id exists and belongs to `user_id`
    async fn categories_owned_by(&self, user_id: Uuid, ids: &[Uuid]) -> Result<bool, StoreError>;
}

/// Tasks and their category links
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task and its links atomically
    async fn insert_task(&self, data: NewTask) -> Result<Task, StoreError>;

    /// Applies changes atomically; false if the task does not exist
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<bool, StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<TaskDetails>, StoreError>;

    /// One page of the user's tasks ordered by title
    async fn list_tasks(&self, user_id: Uuid, page: Page) -> Result<Vec<TaskSummary>, StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Flips the completion flag and returns the new value
    async fn toggle_task_done(&self, id: Uuid) -> Result<Option<bool>, StoreError>;
}

/// Categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert_category(&self, data: NewCategory) -> Result<Category, StoreError>;

    /// Deletes a category owned by `user_id`; false if unknown or foreign
    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;

    /// One page of the user's categories ordered by name
    async fn list_categories(&self, user_id: Uuid, page: Page) -> Result<Vec<Category>, StoreError>;
}

/// Complete persistence backend
#[async_trait]
pub trait Store: UserStore + OwnershipStore + TaskStore + CategoryStore {
    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
