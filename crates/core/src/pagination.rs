//! Page-based pagination and sort direction shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Upper bound on the page size a client may request.
pub const MAX_PER_PAGE: i64 = 100;

/// A validated page request (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    /// Build a page from raw query values, clamping out-of-range input
    /// instead of rejecting it.
    pub fn from_params(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::from_params(None, None)
    }
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(page: Page, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + page.per_page - 1) / page.per_page;
        Self {
            page: page.page,
            per_page: page.per_page,
            total,
            total_pages,
        }
    }
}

/// Sort direction for list queries (`?sort_dir=asc|desc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let page = Page::from_params(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let page = Page::from_params(Some(-3), Some(10_000));
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, MAX_PER_PAGE);

        let page = Page::from_params(Some(2), Some(0));
        assert_eq!(page.per_page, 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = Page::from_params(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::from_params(Some(1), Some(10));
        assert_eq!(PageMeta::new(page, 0).total_pages, 0);
        assert_eq!(PageMeta::new(page, 10).total_pages, 1);
        assert_eq!(PageMeta::new(page, 11).total_pages, 2);
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(SortDirection::default().as_sql(), "DESC");
        let dir: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(dir, SortDirection::Asc);
    }
}
