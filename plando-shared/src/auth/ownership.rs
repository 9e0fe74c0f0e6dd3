/// Ownership checks for tasks and categories
///
/// Answers "does this user own that resource?" for the authorization gates.
/// A missing resource is reported as not owned, never as an error, so callers
/// cannot tell "absent" from "belongs to someone else".
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use plando_shared::auth::ownership::OwnershipChecker;
/// use plando_shared::store::memory::MemoryStore;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), plando_shared::auth::ownership::OwnershipError> {
/// let checker = OwnershipChecker::new(Arc::new(MemoryStore::new()));
///
/// assert!(!checker.owns_task(Uuid::new_v4(), Uuid::new_v4()).await?);
/// assert!(checker.owns_categories(Uuid::new_v4(), &[]).await?);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::store::{OwnershipStore, StoreError};

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// The lookup itself failed
    #[error("ownership lookup failed: {op}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Decides whether a user owns a task or a set of categories
#[derive(Clone)]
pub struct OwnershipChecker {
    store: Arc<dyn OwnershipStore>,
}

impl OwnershipChecker {
    pub fn new(store: Arc<dyn OwnershipStore>) -> Self {
        Self { store }
    }

    /// True iff the task exists and belongs to `user_id`
    pub async fn owns_task(&self, user_id: Uuid, task_id: Uuid) -> Result<bool, OwnershipError> {
        let owned = self
            .store
            .task_owned_by(task_id, user_id)
            .await
            .map_err(|source| OwnershipError::Store {
                op: "task ownership",
                source,
            })?;

        debug!(user_id = %user_id, task_id = %task_id, owned, "Checked task ownership");
        Ok(owned)
    }

    /// True iff every id exists and belongs to `user_id`
    ///
    /// An empty list is vacuously owned and skips the store entirely.
    pub async fn owns_categories(
        &self,
        user_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<bool, OwnershipError> {
        if category_ids.is_empty() {
            return Ok(true);
        }

        let owned = self
            .store
            .categories_owned_by(user_id, category_ids)
            .await
            .map_err(|source| OwnershipError::Store {
                op: "category ownership",
                source,
            })?;

        debug!(
            user_id = %user_id,
            categories = category_ids.len(),
            owned,
            "Checked category ownership"
        );
        Ok(owned)
    }
}
