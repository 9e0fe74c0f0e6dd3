/// Task model and database operations
///
/// A task belongs to one user and links to any number of that user's
/// categories. Creation and update write the task row and its join rows in a
/// single transaction, so a task is never left with a partial category set.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     title VARCHAR(128) NOT NULL,
///     description VARCHAR(1000) NOT NULL DEFAULT '',
///     is_done BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE task_category (
///     task_id UUID NOT NULL REFERENCES tasks (id) ON DELETE CASCADE,
///     category_id UUID NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
///     PRIMARY KEY (task_id, category_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use plando_shared::models::task::{NewTask, Task};
/// use plando_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(user_id: Uuid, work: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, NewTask {
///     user_id,
///     title: "Write report".to_string(),
///     description: String::new(),
///     category_ids: vec![work],
/// }).await?;
///
/// let done = Task::toggle_done(&pool, task.id).await?;
/// assert_eq!(done, Some(true));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

use super::category::{distinct_ids, CategoryRef};
use super::page::Page;

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    pub title: String,

    pub description: String,

    /// Completion flag, toggled by the readiness endpoint
    pub is_done: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Full task view with linked categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub is_done: bool,
    pub categories: Vec<CategoryRef>,
}

/// Task as listed in a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskSummary {
    pub id: Uuid,
    pub title: String,
    pub is_done: bool,
}

/// Task fields as submitted by a client on create and update
///
/// `category_ids` absent means "no categories" on create and "leave the
/// current set alone" on update. Present (even empty) replaces the set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 128, message = "title must be 1 to 128 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: String,

    #[serde(default)]
    pub category_ids: Option<Vec<Uuid>>,
}

impl TaskRequest {
    /// Category ids referenced by this input (empty if none given)
    pub fn referenced_categories(&self) -> &[Uuid] {
        self.category_ids.as_deref().unwrap_or(&[])
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_ids: Vec<Uuid>,
}

/// Changes applied by a task update
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,

    /// Replacement category set; `None` keeps the current links
    pub category_ids: Option<Vec<Uuid>>,
}

async fn link_categories(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    let ids = distinct_ids(category_ids);
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO task_category (task_id, category_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(task_id)
    .bind(&ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

impl Task {
    /// Inserts a task and its category links atomically
    ///
    /// # Errors
    ///
    /// A foreign key violation if a category id does not exist (nothing is written).
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, is_done, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        link_categories(&mut tx, task.id, &data.category_ids).await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Updates title/description and optionally replaces the category set atomically
    ///
    /// Returns false if the task does not exist.
    pub async fn update(pool: &PgPool, id: Uuid, changes: TaskChanges) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(false);
        }

        if let Some(category_ids) = changes.category_ids {
            sqlx::query("DELETE FROM task_category WHERE task_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            link_categories(&mut tx, id, &category_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_done, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Loads a task together with its categories
    pub async fn find_details(pool: &PgPool, id: Uuid) -> Result<Option<TaskDetails>, sqlx::Error> {
        let Some(task) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let categories = sqlx::query_as::<_, CategoryRef>(
            r#"
            SELECT c.id, c.name
            FROM categories c
            JOIN task_category tc ON tc.category_id = c.id
            WHERE tc.task_id = $1
            ORDER BY c.name ASC, c.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(TaskDetails {
            id: task.id,
            title: task.title,
            description: task.description,
            is_done: task.is_done,
            categories,
        }))
    }

    /// Lists a user's tasks ordered by title
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        page: Page,
    ) -> Result<Vec<TaskSummary>, sqlx::Error> {
        sqlx::query_as::<_, TaskSummary>(
            r#"
            SELECT id, title, is_done
            FROM tasks
            WHERE user_id = $1
            ORDER BY title ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Deletes a task; join rows go with it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips `is_done` in a single statement and returns the new value
    pub async fn toggle_done(pool: &PgPool, id: Uuid) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            UPDATE tasks
            SET is_done = NOT is_done, updated_at = NOW()
            WHERE id = $1
            RETURNING is_done
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Checks whether `task_id` exists and belongs to `user_id`
    pub async fn is_owned_by(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1 AND user_id = $2)")
            .bind(task_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
