use serde::{Deserialize, Serialize};
use validator::Validate;

/// 1-based page selection used by the list endpoints
///
/// ```
/// use plando_shared::models::page::Page;
///
/// let page = Page::new(2, 5);
/// assert_eq!(page.offset(), 5);
/// assert_eq!(page.limit(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Page {
    /// Page number, starting at 1
    #[validate(range(min = 1, max = 1000000, message = "page_index must be between 1 and 1000000"))]
    pub page_index: i64,

    /// Page size
    #[validate(range(min = 1, max = 1000, message = "records_per_page must be between 1 and 1000"))]
    pub records_per_page: i64,
}

impl Page {
    pub fn new(page_index: i64, records_per_page: i64) -> Self {
        Self {
            page_index,
            records_per_page,
        }
    }

    /// Rows to skip; saturates instead of overflowing on unvalidated input
    pub fn offset(&self) -> i64 {
        self.page_index
            .saturating_sub(1)
            .saturating_mul(self.records_per_page)
    }

    /// Rows to return
    pub fn limit(&self) -> i64 {
        self.records_per_page
    }
}
