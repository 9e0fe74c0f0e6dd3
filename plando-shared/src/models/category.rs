/// Category model and database operations
///
/// Categories belong to exactly one user. Tasks reference them through the
/// `task_category` join table but never own them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::page::Page;

/// Category owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    pub name: String,
}

/// Category as embedded in a task view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

/// Category fields as submitted by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub user_id: Uuid,
    pub name: String,
}

/// Removes duplicate ids while keeping the first occurrence order
pub fn distinct_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

impl Category {
    /// Inserts a category for its owner
    pub async fn create(pool: &PgPool, data: NewCategory) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Deletes a category if it belongs to `user_id`
    ///
    /// Returns false when the id is unknown or owned by someone else.
    pub async fn delete_owned(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a user's categories ordered by name
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name
            FROM categories
            WHERE user_id = $1
            ORDER BY name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Checks in one round trip that every id exists and belongs to `user_id`
    ///
    /// An empty slice is vacuously owned.
    pub async fn all_owned_by(
        pool: &PgPool,
        user_id: Uuid,
        ids: &[Uuid],
    ) -> Result<bool, sqlx::Error> {
        let ids = distinct_ids(ids);
        if ids.is_empty() {
            return Ok(true);
        }

        let owned: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM categories
            WHERE id = ANY($1) AND user_id = $2
            "#,
        )
        .bind(&ids)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(owned == ids.len() as i64)
    }
}
