//! Hearing entity model and DTOs.

use adala_core::pagination::SortDirection;
use adala_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A hearing row from the `hearings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hearing {
    pub id: DbId,
    pub case_id: DbId,
    pub lawyer_id: Option<DbId>,
    pub hearing_type: String,
    pub status: String,
    pub scheduled_at: Timestamp,
    pub court_name: Option<String>,
    pub courtroom: Option<String>,
    pub judge_name: Option<String>,
    pub notes: Option<String>,
    pub outcome: Option<String>,
    pub postponement_reason: Option<String>,
    /// The hearing this one follows up on (set by complete-with-follow-up).
    pub previous_hearing_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A hearing with its case and lawyer display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HearingListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub hearing: Hearing,
    pub case_number: String,
    pub case_title: String,
    pub case_title_ar: Option<String>,
    pub lawyer_name: Option<String>,
}

/// DTO for creating a new hearing.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHearing {
    pub case_id: DbId,
    pub lawyer_id: Option<DbId>,
    /// Defaults to `pleading` if omitted.
    pub hearing_type: Option<String>,
    pub scheduled_at: Timestamp,
    #[validate(length(max = 200))]
    pub court_name: Option<String>,
    #[validate(length(max = 100))]
    pub courtroom: Option<String>,
    #[validate(length(max = 200))]
    pub judge_name: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing hearing. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateHearing {
    pub lawyer_id: Option<DbId>,
    pub hearing_type: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    #[validate(length(max = 200))]
    pub court_name: Option<String>,
    #[validate(length(max = 100))]
    pub courtroom: Option<String>,
    #[validate(length(max = 200))]
    pub judge_name: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `POST /hearings/{id}/postpone`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostponeHearing {
    pub scheduled_at: Timestamp,
    #[validate(length(min = 1, max = 1000, message = "A postponement reason is required"))]
    pub reason: String,
}

/// Follow-up session to schedule when a hearing is completed.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowUpHearing {
    pub scheduled_at: Timestamp,
    /// Defaults to the completed hearing's type.
    pub hearing_type: Option<String>,
}

/// Request body for `POST /hearings/{id}/complete`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompleteHearing {
    #[validate(length(min = 1, max = 4000, message = "The hearing outcome is required"))]
    pub outcome: String,
    pub next_hearing: Option<FollowUpHearing>,
}

/// Query parameters for `GET /hearings`.
#[derive(Debug, Default, Deserialize)]
pub struct HearingQuery {
    pub case_id: Option<DbId>,
    pub lawyer_id: Option<DbId>,
    pub status: Option<String>,
    pub hearing_type: Option<String>,
    /// First day (inclusive) of the scheduled window.
    pub from: Option<Date>,
    /// Last day (inclusive) of the scheduled window.
    pub to: Option<Date>,
    /// Matches case number, case title, court, judge and notes.
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Query parameters for `GET /hearings/upcoming`.
#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    /// Look-ahead window in days (default 7, max 90).
    pub days: Option<i64>,
    pub lawyer_id: Option<DbId>,
}
