//! Handlers for the `/hearings` resource and its postpone / complete /
//! cancel workflow.

use adala_core::case_status;
use adala_core::error::CoreError;
use adala_core::hearing_status;
use adala_core::options::{ensure_valid_opt, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::DbId;
use adala_db::models::hearing::{
    CompleteHearing, CreateHearing, Hearing, HearingListItem, HearingQuery, PostponeHearing,
    UpcomingQuery, UpdateHearing,
};
use adala_db::repositories::{CaseRepo, HearingRepo, LawyerRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::missing_reference;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Look-ahead used by `GET /hearings/upcoming` without `?days=`.
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;
const MAX_UPCOMING_DAYS: i64 = 90;
/// Cap on rows returned by the upcoming list.
pub const UPCOMING_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CancelHearing {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

/// Result of `POST /hearings/{id}/complete`.
#[derive(Debug, Serialize)]
pub struct CompletedHearing {
    pub hearing: Hearing,
    pub next_hearing: Option<Hearing>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Hearing",
        id,
    })
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<HearingListItem> {
    HearingRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn ensure_lawyer(state: &AppState, lawyer_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = lawyer_id {
        if !LawyerRepo::exists(&state.pool, id).await? {
            return Err(missing_reference("Lawyer", id));
        }
    }
    Ok(())
}

/// POST /api/v1/hearings
///
/// The case must exist and still be active.
pub async fn create_hearing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateHearing>,
) -> AppResult<(StatusCode, Json<DataResponse<HearingListItem>>)> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::HearingTypes,
        "hearing_type",
        input.hearing_type.as_deref(),
    )?;

    let case = CaseRepo::find_by_id(&state.pool, input.case_id)
        .await?
        .ok_or_else(|| missing_reference("Case", input.case_id))?;
    if case_status::is_closed(&case.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot schedule a hearing on a '{}' case",
            case.status
        ))));
    }
    ensure_lawyer(&state, input.lawyer_id).await?;

    let hearing = HearingRepo::create(&state.pool, &input).await?;
    tracing::info!(
        hearing_id = hearing.id,
        case_id = hearing.case_id,
        user_id = auth.user_id,
        "Hearing scheduled"
    );

    let detail = load_detail(&state, hearing.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/hearings
pub async fn list_hearings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<HearingQuery>,
) -> AppResult<Json<PaginatedResponse<HearingListItem>>> {
    let page = Page::from_params(params.page, params.per_page);
    let hearings = HearingRepo::list(&state.pool, &params, page).await?;
    let total = HearingRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(hearings, page, total)))
}

/// GET /api/v1/hearings/upcoming?days=&lawyer_id=
///
/// Pending hearings from now until `days` ahead, soonest first.
pub async fn upcoming_hearings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<UpcomingQuery>,
) -> AppResult<Json<DataResponse<Vec<HearingListItem>>>> {
    let days = upcoming_days(params.days);
    let hearings =
        HearingRepo::upcoming(&state.pool, days, params.lawyer_id, UPCOMING_LIMIT).await?;
    Ok(Json(DataResponse { data: hearings }))
}

/// Clamp a requested look-ahead to `1..=90` days.
pub(crate) fn upcoming_days(requested: Option<i64>) -> i32 {
    // Bounded by MAX_UPCOMING_DAYS, so the cast cannot truncate.
    requested
        .unwrap_or(DEFAULT_UPCOMING_DAYS)
        .clamp(1, MAX_UPCOMING_DAYS) as i32
}

/// GET /api/v1/hearings/{id}
pub async fn get_hearing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HearingListItem>>> {
    let hearing = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: hearing }))
}

/// PUT /api/v1/hearings/{id}
///
/// Rescheduling is only allowed while the hearing is pending; use
/// `postpone` to record a reason.
pub async fn update_hearing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHearing>,
) -> AppResult<Json<DataResponse<HearingListItem>>> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::HearingTypes,
        "hearing_type",
        input.hearing_type.as_deref(),
    )?;
    ensure_lawyer(&state, input.lawyer_id).await?;

    let current = HearingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if input.scheduled_at.is_some() && !hearing_status::is_pending(&current.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot reschedule a hearing that is '{}'",
            current.status
        ))));
    }

    HearingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    let hearing = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: hearing }))
}

/// DELETE /api/v1/hearings/{id}
pub async fn delete_hearing(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !HearingRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(hearing_id = id, user_id = user.user_id, "Hearing deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/hearings/{id}/postpone
///
/// The new date must lie in the future.
pub async fn postpone_hearing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PostponeHearing>,
) -> AppResult<Json<DataResponse<Hearing>>> {
    input.validate()?;
    if input.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A postponement reason is required".into(),
        )));
    }
    if input.scheduled_at <= Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "A postponed hearing must be rescheduled to a future date".into(),
        )));
    }

    let hearing = HearingRepo::postpone(&state.pool, id, input.scheduled_at, &input.reason)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(hearing_id = id, user_id = auth.user_id, "Hearing postponed");
    Ok(Json(DataResponse { data: hearing }))
}

/// POST /api/v1/hearings/{id}/complete
///
/// Records the outcome; an optional `next_hearing` schedules the follow-up
/// session in the same transaction.
pub async fn complete_hearing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteHearing>,
) -> AppResult<Json<DataResponse<CompletedHearing>>> {
    input.validate()?;
    if input.outcome.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "The hearing outcome is required".into(),
        )));
    }
    if let Some(next) = &input.next_hearing {
        ensure_valid_opt(
            OptionKind::HearingTypes,
            "next_hearing.hearing_type",
            next.hearing_type.as_deref(),
        )?;
        if next.scheduled_at <= Utc::now() {
            return Err(AppError::Core(CoreError::Validation(
                "The follow-up hearing must be scheduled in the future".into(),
            )));
        }
    }

    let (hearing, next_hearing) = HearingRepo::complete(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        hearing_id = id,
        next_hearing_id = next_hearing.as_ref().map(|h| h.id),
        user_id = auth.user_id,
        "Hearing completed"
    );
    Ok(Json(DataResponse {
        data: CompletedHearing {
            hearing,
            next_hearing,
        },
    }))
}

/// POST /api/v1/hearings/{id}/cancel
///
/// The body is optional; without one the hearing is cancelled with no reason.
pub async fn cancel_hearing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    input: Option<Json<CancelHearing>>,
) -> AppResult<Json<DataResponse<Hearing>>> {
    let reason = match &input {
        Some(Json(body)) => {
            body.validate()?;
            body.reason.as_deref()
        }
        None => None,
    };
    let hearing = HearingRepo::cancel(&state.pool, id, reason)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(hearing_id = id, user_id = auth.user_id, "Hearing cancelled");
    Ok(Json(DataResponse { data: hearing }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upcoming_window_is_clamped() {
        assert_eq!(upcoming_days(None), 7);
        assert_eq!(upcoming_days(Some(30)), 30);
        assert_eq!(upcoming_days(Some(0)), 1);
        assert_eq!(upcoming_days(Some(-4)), 1);
        assert_eq!(upcoming_days(Some(10_000)), 90);
    }
}
