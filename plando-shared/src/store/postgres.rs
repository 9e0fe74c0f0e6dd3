use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CategoryStore, OwnershipStore, Store, StoreError, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::category::{Category, NewCategory};
use crate::models::page::Page;
use crate::models::task::{NewTask, Task, TaskChanges, TaskDetails, TaskSummary};
use crate::models::user::{CreateUser, User};

/// Postgres-backed store
///
/// A thin adapter over the model queries; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_name(&self.pool, name).await?)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(User::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl OwnershipStore for PgStore {
    async fn task_owned_by(&self, task_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(Task::is_owned_by(&self.pool, task_id, user_id).await?)
    }

    async fn categories_owned_by(&self, user_id: Uuid, ids: &[Uuid]) -> Result<bool, StoreError> {
        Ok(Category::all_owned_by(&self.pool, user_id, ids).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: NewTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<bool, StoreError> {
        Ok(Task::update(&self.pool, id, changes).await?)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<TaskDetails>, StoreError> {
        Ok(Task::find_details(&self.pool, id).await?)
    }

    async fn list_tasks(&self, user_id: Uuid, page: Page) -> Result<Vec<TaskSummary>, StoreError> {
        Ok(Task::list_by_user(&self.pool, user_id, page).await?)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn toggle_task_done(&self, id: Uuid) -> Result<Option<bool>, StoreError> {
        Ok(Task::toggle_done(&self.pool, id).await?)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn insert_category(&self, data: NewCategory) -> Result<Category, StoreError> {
        Ok(Category::create(&self.pool, data).await?)
    }

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        Ok(Category::delete_owned(&self.pool, user_id, id).await?)
    }

    async fn list_categories(&self, user_id: Uuid, page: Page) -> Result<Vec<Category>, StoreError> {
        Ok(Category::list_by_user(&self.pool, user_id, page).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
