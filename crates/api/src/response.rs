//! Response envelopes.
//!
//! Single resources are returned as `{ "data": ... }` and lists as
//! `{ "data": [...], "meta": { page, per_page, total, total_pages } }`.

use adala_core::pagination::{Page, PageMeta};
use serde::Serialize;

/// Standard `{ "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: Page, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta::new(page, total),
        }
    }
}
