/// Resource services
///
/// Owner-scoped operations on tasks and categories. Ownership itself is
/// established by the gates before these run; the services validate input,
/// call the store and translate store outcomes into [`ServiceError`].
///
/// - [`task::TaskService`]: create, update, get, list, delete, toggle readiness
/// - [`category::CategoryService`]: create, delete, list

use uuid::Uuid;
use validator::ValidationErrors;

use crate::store::{
    StoreError, CATEGORIES_USER_FKEY, TASKS_USER_FKEY, TASK_CATEGORY_CATEGORY_FKEY,
};

pub mod category;
pub mod task;

/// Error type for resource services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before touching the store
    #[error("{0}")]
    Validation(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: Uuid },

    /// A referenced row disappeared between the ownership check and the write
    #[error("referenced {0} no longer exists")]
    StaleReference(&'static str),

    /// The acting user's account was deleted while their token is still valid
    #[error("account no longer exists")]
    AccountGone,

    #[error("{op} failed")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    /// Classifies a store failure
    ///
    /// Foreign key violations are told apart by constraint name: a missing
    /// owner means the account is gone, a missing link target means a
    /// category was deleted after the ownership check.
    pub(crate) fn store(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| {
            if let StoreError::ForeignKeyViolation(constraint) = &source {
                match constraint.as_str() {
                    TASKS_USER_FKEY | CATEGORIES_USER_FKEY => return ServiceError::AccountGone,
                    TASK_CATEGORY_CATEGORY_FKEY => {
                        return ServiceError::StaleReference("category");
                    }
                    _ => {}
                }
            }
            ServiceError::Store { op, source }
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(describe_validation(&errors))
    }
}

/// Flattens validator errors into one human-readable line
pub fn describe_validation(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::page::Page;
    use validator::Validate;

    #[test]
    fn test_describe_validation_joins_messages() {
        let errors = Page::new(0, 0).validate().unwrap_err();
        assert_eq!(
            describe_validation(&errors),
            "page_index must be between 1 and 1000000, records_per_page must be between 1 and 1000"
        );
    }

    #[test]
    fn test_category_link_violation_is_stale_reference() {
        let err = ServiceError::store("insert task")(
            StoreError::ForeignKeyViolation(TASK_CATEGORY_CATEGORY_FKEY.to_string()),
        );
        assert!(matches!(err, ServiceError::StaleReference("category")));
    }

    #[test]
    fn test_owner_violation_is_account_gone() {
        for constraint in [TASKS_USER_FKEY, CATEGORIES_USER_FKEY] {
            let err = ServiceError::store("insert")(StoreError::ForeignKeyViolation(
                constraint.to_string(),
            ));
            assert!(matches!(err, ServiceError::AccountGone));
        }
    }

    #[test]
    fn test_unknown_foreign_key_stays_a_store_error() {
        let err = ServiceError::store("insert task")(
            StoreError::ForeignKeyViolation("some_other_fkey".to_string()),
        );
        assert!(matches!(err, ServiceError::Store { op: "insert task", .. }));
    }
}
