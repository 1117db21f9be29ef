//! Case entity model, team membership and DTOs.

use adala_core::pagination::SortDirection;
use adala_core::types::{Date, DbId, Timestamp};
use adala_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A case row from the `cases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LegalCase {
    pub id: DbId,
    pub case_number: String,
    pub title: String,
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub client_id: DbId,
    pub lead_lawyer_id: Option<DbId>,
    pub case_type: String,
    pub status: String,
    pub priority: String,
    pub court_name: Option<String>,
    pub court_reference: Option<String>,
    pub opponent_name: Option<String>,
    pub opened_on: Date,
    pub closed_on: Option<Date>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A case with the display names of its client and lead lawyer, as
/// returned by list and detail endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub case: LegalCase,
    pub client_name: String,
    pub client_name_ar: Option<String>,
    pub lead_lawyer_name: Option<String>,
}

/// DTO for creating a new case.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCase {
    /// Generated (`CASE-<year>-<seq>`) when omitted.
    #[validate(length(min = 1, max = 50))]
    pub case_number: Option<String>,
    #[validate(
        length(min = 1, max = 300, message = "Title must be 1-300 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[validate(length(max = 300))]
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub client_id: DbId,
    pub lead_lawyer_id: Option<DbId>,
    pub case_type: String,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    #[validate(length(max = 200))]
    pub court_name: Option<String>,
    #[validate(length(max = 100))]
    pub court_reference: Option<String>,
    #[validate(length(max = 200))]
    pub opponent_name: Option<String>,
    /// Defaults to today if omitted.
    pub opened_on: Option<Date>,
}

/// DTO for updating an existing case. Status changes go through
/// [`ChangeCaseStatus`] instead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCase {
    #[validate(
        length(min = 1, max = 300, message = "Title must be 1-300 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 300))]
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<DbId>,
    pub lead_lawyer_id: Option<DbId>,
    pub case_type: Option<String>,
    pub priority: Option<String>,
    #[validate(length(max = 200))]
    pub court_name: Option<String>,
    #[validate(length(max = 100))]
    pub court_reference: Option<String>,
    #[validate(length(max = 200))]
    pub opponent_name: Option<String>,
    pub opened_on: Option<Date>,
}

/// Request body for `PUT /cases/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeCaseStatus {
    pub status: String,
    /// Closing date; defaults to today when the new status closes the case.
    pub closed_on: Option<Date>,
}

/// Query parameters for `GET /cases`.
#[derive(Debug, Default, Deserialize)]
pub struct CaseQuery {
    /// Matches case number, title (both languages), opponent and court reference.
    pub search: Option<String>,
    pub status: Option<String>,
    pub case_type: Option<String>,
    pub priority: Option<String>,
    pub client_id: Option<DbId>,
    /// Lead lawyer or team member.
    pub lawyer_id: Option<DbId>,
    pub opened_from: Option<Date>,
    pub opened_to: Option<Date>,
    /// Exclude closed and archived cases.
    pub active_only: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A lawyer assigned to a case, joined with the lawyer's names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseLawyer {
    pub case_id: DbId,
    pub lawyer_id: DbId,
    pub role: String,
    pub assigned_at: Timestamp,
    pub full_name: String,
    pub full_name_ar: Option<String>,
}

/// Request body for `POST /cases/{id}/lawyers`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignLawyer {
    pub lawyer_id: DbId,
    /// Defaults to `associate` if omitted.
    pub role: Option<String>,
}
