//! In-memory store - used by tests and local runs without Postgres.
//!
//! Mirrors the relational behavior the Postgres schema enforces: unique user
//! names, owners and category references that must exist, and cascading
//! deletes.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CategoryStore, OwnershipStore, Store, StoreError, TaskStore, UserStore, CATEGORIES_USER_FKEY,
    TASKS_USER_FKEY, TASK_CATEGORY_CATEGORY_FKEY,
};
use crate::models::category::{distinct_ids, Category, CategoryRef, NewCategory};
use crate::models::page::Page;
use crate::models::task::{NewTask, Task, TaskChanges, TaskDetails, TaskSummary};
use crate::models::user::{CreateUser, User, USERS_NAME_KEY};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    tasks: HashMap<Uuid, Task>,
    /// task id -> linked category ids
    links: HashMap<Uuid, Vec<Uuid>>,
}

impl State {
    fn check_user_exists(&self, user_id: Uuid, constraint: &str) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    fn check_categories_exist(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        if ids.iter().all(|id| self.categories.contains_key(id)) {
            Ok(())
        } else {
            Err(StoreError::ForeignKeyViolation(TASK_CATEGORY_CATEGORY_FKEY.to_string()))
        }
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let skip = usize::try_from(page.offset()).unwrap_or(0);
    let take = usize::try_from(page.limit()).unwrap_or(0);
    items.into_iter().skip(skip).take(take).collect()
}

/// Store keeping everything in process memory behind an async `RwLock`
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.name == data.name) {
            return Err(StoreError::UniqueViolation(USERS_NAME_KEY.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.name == name).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        if state.users.remove(&id).is_none() {
            return Ok(false);
        }

        let owned_tasks: Vec<Uuid> = state
            .tasks
            .values()
            .filter(|t| t.user_id == id)
            .map(|t| t.id)
            .collect();
        for task_id in owned_tasks {
            state.tasks.remove(&task_id);
            state.links.remove(&task_id);
        }

        state.categories.retain(|_, c| c.user_id != id);
        let State {
            categories, links, ..
        } = &mut *state;
        for linked in links.values_mut() {
            linked.retain(|category_id| categories.contains_key(category_id));
        }

        Ok(true)
    }
}

#[async_trait]
impl OwnershipStore for MemoryStore {
    async fn task_owned_by(&self, task_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .get(&task_id)
            .is_some_and(|t| t.user_id == user_id))
    }

    async fn categories_owned_by(&self, user_id: Uuid, ids: &[Uuid]) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(ids.iter().all(|id| {
            state
                .categories
                .get(id)
                .is_some_and(|c| c.user_id == user_id)
        }))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: NewTask) -> Result<Task, StoreError> {
        let mut state = self.state.write().await;

        state.check_user_exists(data.user_id, TASKS_USER_FKEY)?;
        let category_ids = distinct_ids(&data.category_ids);
        state.check_categories_exist(&category_ids)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            is_done: false,
            created_at: now,
            updated_at: now,
        };

        state.tasks.insert(task.id, task.clone());
        state.links.insert(task.id, category_ids);
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        if !state.tasks.contains_key(&id) {
            return Ok(false);
        }

        let category_ids = changes.category_ids.as_deref().map(distinct_ids);
        if let Some(ids) = &category_ids {
            state.check_categories_exist(ids)?;
        }

        if let Some(task) = state.tasks.get_mut(&id) {
            task.title = changes.title;
            task.description = changes.description;
            task.updated_at = Utc::now();
        }
        if let Some(ids) = category_ids {
            state.links.insert(id, ids);
        }

        Ok(true)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<TaskDetails>, StoreError> {
        let state = self.state.read().await;

        let Some(task) = state.tasks.get(&id) else {
            return Ok(None);
        };

        let mut categories: Vec<CategoryRef> = state
            .links
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|category_id| state.categories.get(category_id))
            .map(CategoryRef::from)
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(Some(TaskDetails {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            is_done: task.is_done,
            categories,
        }))
    }

    async fn list_tasks(&self, user_id: Uuid, page: Page) -> Result<Vec<TaskSummary>, StoreError> {
        let state = self.state.read().await;

        let mut tasks: Vec<TaskSummary> = state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .map(|t| TaskSummary {
                id: t.id,
                title: t.title.clone(),
                is_done: t.is_done,
            })
            .collect();
        tasks.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        Ok(paginate(tasks, page))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        state.links.remove(&id);
        Ok(state.tasks.remove(&id).is_some())
    }

    async fn toggle_task_done(&self, id: Uuid) -> Result<Option<bool>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.tasks.get_mut(&id).map(|task| {
            task.is_done = !task.is_done;
            task.updated_at = Utc::now();
            task.is_done
        }))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn insert_category(&self, data: NewCategory) -> Result<Category, StoreError> {
        let mut state = self.state.write().await;
        state.check_user_exists(data.user_id, CATEGORIES_USER_FKEY)?;

        let category = Category {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        let owned = state
            .categories
            .get(&id)
            .is_some_and(|c| c.user_id == user_id);
        if !owned {
            return Ok(false);
        }

        state.categories.remove(&id);
        for linked in state.links.values_mut() {
            linked.retain(|category_id| *category_id != id);
        }
        Ok(true)
    }

    async fn list_categories(&self, user_id: Uuid, page: Page) -> Result<Vec<Category>, StoreError> {
        let state = self.state.read().await;

        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(paginate(categories, page))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
