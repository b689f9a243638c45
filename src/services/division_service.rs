use std::sync::Arc;

use crate::database::models::DivisionSummary;
use crate::database::{DivisionFilter, Store};
use crate::error::ApiError;
use crate::types::{Page, PageRequest};

/// Read-only access to divisions
#[derive(Clone)]
pub struct DivisionService {
    store: Arc<dyn Store>,
    page_size: u32,
}

impl DivisionService {
    pub fn new(store: Arc<dyn Store>, page_size: u32) -> Self {
        Self { store, page_size }
    }

    /// One page of divisions, optionally narrowed by a name substring
    pub async fn list(
        &self,
        name: Option<&str>,
        page: Option<&str>,
    ) -> Result<Page<DivisionSummary>, ApiError> {
        let request = PageRequest::from_query(page, self.page_size);
        let filter = DivisionFilter {
            name: non_blank(name),
        };

        let (rows, total) = self.store.list_divisions(&filter, request).await?;
        Ok(Page::new(rows, total, request).map(DivisionSummary::from))
    }
}

/// Query filters that are empty or whitespace are treated as absent
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
