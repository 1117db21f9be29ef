//! Client entity model and DTOs.

use adala_core::pagination::SortDirection;
use adala_core::types::{DbId, Timestamp};
use adala_core::validation::{validate_not_blank, validate_phone};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub client_type: String,
    pub name: String,
    pub name_ar: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub commercial_register: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    /// Defaults to `individual` if omitted.
    pub client_type: Option<String>,
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(length(max = 200))]
    pub name_ar: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 50))]
    pub national_id: Option<String>,
    #[validate(length(max = 50))]
    pub commercial_register: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClient {
    pub client_type: Option<String>,
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub name_ar: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 50))]
    pub national_id: Option<String>,
    #[validate(length(max = 50))]
    pub commercial_register: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /clients`.
#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    /// Matches name, Arabic name, email, phone and national id.
    pub search: Option<String>,
    pub client_type: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
