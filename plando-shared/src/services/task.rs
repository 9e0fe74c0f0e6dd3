use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::ServiceError;
use crate::models::page::Page;
use crate::models::task::{NewTask, TaskChanges, TaskDetails, TaskRequest, TaskSummary};
use crate::store::TaskStore;

/// Task operations for an already-authorized caller
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound {
        resource: "task",
        id,
    }
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Creates a task with its categories in one transaction
    pub async fn create(&self, user_id: Uuid, request: TaskRequest) -> Result<Uuid, ServiceError> {
        request.validate()?;

        let task = self
            .store
            .insert_task(NewTask {
                user_id,
                title: request.title,
                description: request.description,
                category_ids: request.category_ids.unwrap_or_default(),
            })
            .await
            .map_err(ServiceError::store("insert task"))?;

        info!(user_id = %user_id, task_id = %task.id, "Task created");
        Ok(task.id)
    }

    /// Replaces title and description; replaces categories only when given
    pub async fn update(&self, task_id: Uuid, request: TaskRequest) -> Result<(), ServiceError> {
        request.validate()?;

        let updated = self
            .store
            .update_task(
                task_id,
                TaskChanges {
                    title: request.title,
                    description: request.description,
                    category_ids: request.category_ids,
                },
            )
            .await
            .map_err(ServiceError::store("update task"))?;

        if !updated {
            return Err(not_found(task_id));
        }

        info!(task_id = %task_id, "Task updated");
        Ok(())
    }

    pub async fn get(&self, task_id: Uuid) -> Result<TaskDetails, ServiceError> {
        self.store
            .find_task(task_id)
            .await
            .map_err(ServiceError::store("find task"))?
            .ok_or_else(|| not_found(task_id))
    }

    /// One page of the user's tasks, ordered by title
    pub async fn list(&self, user_id: Uuid, page: Page) -> Result<Vec<TaskSummary>, ServiceError> {
        page.validate()?;

        let tasks = self
            .store
            .list_tasks(user_id, page)
            .await
            .map_err(ServiceError::store("list tasks"))?;

        debug!(user_id = %user_id, page = page.page_index, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    pub async fn delete(&self, task_id: Uuid) -> Result<(), ServiceError> {
        let deleted = self
            .store
            .delete_task(task_id)
            .await
            .map_err(ServiceError::store("delete task"))?;

        if !deleted {
            return Err(not_found(task_id));
        }

        info!(task_id = %task_id, "Task deleted");
        Ok(())
    }

    /// Flips the completion flag, returning the new value
    pub async fn toggle_done(&self, task_id: Uuid) -> Result<bool, ServiceError> {
        let is_done = self
            .store
            .toggle_task_done(task_id)
            .await
            .map_err(ServiceError::store("toggle task"))?
            .ok_or_else(|| not_found(task_id))?;

        debug!(task_id = %task_id, is_done, "Task readiness toggled");
        Ok(is_done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::NewCategory;
    use crate::models::user::CreateUser;
    use crate::store::memory::MemoryStore;
    use crate::store::{CategoryStore, UserStore};

    async fn account(store: &MemoryStore, name: &str) -> Uuid {
        store
            .insert_user(CreateUser {
                name: name.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn request(title: &str, category_ids: Option<Vec<Uuid>>) -> TaskRequest {
        TaskRequest {
            title: title.to_string(),
            description: String::new(),
            category_ids,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = Arc::new(MemoryStore::new());
        let service = TaskService::new(store.clone());
        let user_id = account(&store, "alice").await;
        let work = store
            .insert_category(NewCategory {
                user_id,
                name: "work".to_string(),
            })
            .await
            .unwrap();

        let id = service
            .create(user_id, request("report", Some(vec![work.id])))
            .await
            .unwrap();

        let task = service.get(id).await.unwrap();
        assert_eq!(task.title, "report");
        assert!(!task.is_done);
        assert_eq!(task.categories.len(), 1);
        assert_eq!(task.categories[0].name, "work");
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));

        let err = service
            .create(Uuid::new_v4(), request("", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deleted_category_is_stale_reference() {
        let store = Arc::new(MemoryStore::new());
        let service = TaskService::new(store.clone());
        let user_id = account(&store, "alice").await;

        let err = service
            .create(user_id, request("t", Some(vec![Uuid::new_v4()])))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::StaleReference("category")));
    }

    #[tokio::test]
    async fn test_create_for_deleted_account_is_account_gone() {
        let store = Arc::new(MemoryStore::new());
        let service = TaskService::new(store.clone());
        let user_id = account(&store, "alice").await;
        store.delete_user(user_id).await.unwrap();

        let err = service.create(user_id, request("t", None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::AccountGone));
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));
        let id = Uuid::new_v4();

        assert!(matches!(service.get(id).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(service.delete(id).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(service.toggle_done(id).await, Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            service.update(id, request("t", None)).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_page() {
        let service = TaskService::new(Arc::new(MemoryStore::new()));

        let err = service
            .list(Uuid::new_v4(), Page::new(0, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_flag() {
        let store = Arc::new(MemoryStore::new());
        let service = TaskService::new(store.clone());
        let user_id = account(&store, "alice").await;
        let id = service.create(user_id, request("t", None)).await.unwrap();

        assert!(service.toggle_done(id).await.unwrap());
        assert!(!service.toggle_done(id).await.unwrap());
        assert!(!service.get(id).await.unwrap().is_done);
    }
}
