//! Lawyer entity model and DTOs.

use adala_core::pagination::SortDirection;
use adala_core::types::{DbId, Minor, Timestamp};
use adala_core::validation::{validate_not_blank, validate_phone};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A lawyer row from the `lawyers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lawyer {
    pub id: DbId,
    /// Login account, when the lawyer uses the system.
    pub user_id: Option<DbId>,
    pub full_name: String,
    pub full_name_ar: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_number: String,
    pub specialization: String,
    pub hourly_rate_minor: Minor,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new lawyer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLawyer {
    pub user_id: Option<DbId>,
    #[validate(
        length(min = 1, max = 200, message = "Full name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub full_name: String,
    #[validate(length(max = 200))]
    pub full_name_ar: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "License number is required"),
        custom(function = "validate_not_blank")
    )]
    pub license_number: String,
    /// Defaults to `general` if omitted.
    pub specialization: Option<String>,
    #[validate(range(min = 0, message = "Hourly rate must not be negative"))]
    pub hourly_rate_minor: Option<Minor>,
}

/// DTO for updating an existing lawyer. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLawyer {
    pub user_id: Option<DbId>,
    #[validate(
        length(min = 1, max = 200, message = "Full name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub full_name: Option<String>,
    #[validate(length(max = 200))]
    pub full_name_ar: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub license_number: Option<String>,
    pub specialization: Option<String>,
    #[validate(range(min = 0, message = "Hourly rate must not be negative"))]
    pub hourly_rate_minor: Option<Minor>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /lawyers`.
#[derive(Debug, Default, Deserialize)]
pub struct LawyerQuery {
    /// Matches full name (both languages), email and license number.
    pub search: Option<String>,
    pub specialization: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
