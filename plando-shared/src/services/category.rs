use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::ServiceError;
use crate::models::category::{Category, CategoryRequest, NewCategory};
use crate::models::page::Page;
use crate::store::CategoryStore;

/// Category operations scoped to the acting user
#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: Uuid, request: CategoryRequest) -> Result<Uuid, ServiceError> {
        request.validate()?;

        let category = self
            .store
            .insert_category(NewCategory {
                user_id,
                name: request.name,
            })
            .await
            .map_err(ServiceError::store("insert category"))?;

        info!(user_id = %user_id, category_id = %category.id, "Category created");
        Ok(category.id)
    }

    /// Deletes one of the user's categories
    ///
    /// Unknown ids and other users' categories are both `NotFound`.
    pub async fn delete(&self, user_id: Uuid, category_id: Uuid) -> Result<(), ServiceError> {
        let deleted = self
            .store
            .delete_category(user_id, category_id)
            .await
            .map_err(ServiceError::store("delete category"))?;

        if !deleted {
            return Err(ServiceError::NotFound {
                resource: "category",
                id: category_id,
            });
        }

        info!(user_id = %user_id, category_id = %category_id, "Category deleted");
        Ok(())
    }

    pub async fn list(&self, user_id: Uuid, page: Page) -> Result<Vec<Category>, ServiceError> {
        page.validate()?;

        self.store
            .list_categories(user_id, page)
            .await
            .map_err(ServiceError::store("list categories"))
    }
}
