//! Document metadata model and DTOs.
//!
//! A document belongs to exactly one practice record identified by
//! `(entity_type, entity_id)`. The file itself lives in external storage;
//! only its location and metadata are recorded here.

use adala_core::pagination::SortDirection;
use adala_core::types::{DbId, Timestamp};
use adala_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A document row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub title: String,
    pub title_ar: Option<String>,
    pub document_type: String,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub description: Option<String>,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocument {
    pub entity_type: String,
    pub entity_id: DbId,
    #[validate(
        length(min = 1, max = 300, message = "Title must be 1-300 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[validate(length(max = 300))]
    pub title_ar: Option<String>,
    /// Defaults to `other` if omitted.
    pub document_type: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub file_name: String,
    #[validate(length(min = 1, max = 1000), custom(function = "validate_not_blank"))]
    pub file_path: String,
    #[validate(length(max = 100))]
    pub mime_type: Option<String>,
    #[validate(range(min = 0))]
    pub file_size_bytes: Option<i64>,
    pub description: Option<String>,
}

/// DTO for updating document metadata. The owner cannot change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDocument {
    #[validate(
        length(min = 1, max = 300, message = "Title must be 1-300 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 300))]
    pub title_ar: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for `GET /documents`.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub document_type: Option<String>,
    /// Matches title (both languages), file name and description.
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
