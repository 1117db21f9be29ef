//! Handlers for the `/lawyers` resource.
//!
//! Anyone signed in may read; creating, editing and removing lawyers is an
//! admin task.

use adala_core::error::CoreError;
use adala_core::options::{ensure_valid_opt, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::DbId;
use adala_db::models::hearing::{HearingListItem, HearingQuery};
use adala_db::models::lawyer::{CreateLawyer, Lawyer, LawyerQuery, UpdateLawyer};
use adala_db::models::legal_case::{CaseListItem, CaseQuery};
use adala_db::repositories::{CaseRepo, HearingRepo, LawyerRepo, UserRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use super::missing_reference;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Lawyer",
        id,
    })
}

async fn ensure_user(state: &AppState, user_id: Option<DbId>) -> AppResult<()> {
    if let Some(user_id) = user_id {
        if UserRepo::find_by_id(&state.pool, user_id).await?.is_none() {
            return Err(missing_reference("User", user_id));
        }
    }
    Ok(())
}

async fn ensure_lawyer(state: &AppState, id: DbId) -> AppResult<()> {
    if LawyerRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/lawyers
pub async fn create_lawyer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateLawyer>,
) -> AppResult<(StatusCode, Json<DataResponse<Lawyer>>)> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::Specializations,
        "specialization",
        input.specialization.as_deref(),
    )?;
    ensure_user(&state, input.user_id).await?;

    let lawyer = LawyerRepo::create(&state.pool, &input).await?;
    tracing::info!(lawyer_id = lawyer.id, user_id = admin.user_id, "Lawyer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: lawyer })))
}

/// GET /api/v1/lawyers
pub async fn list_lawyers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<LawyerQuery>,
) -> AppResult<Json<PaginatedResponse<Lawyer>>> {
    let page = Page::from_params(params.page, params.per_page);
    let lawyers = LawyerRepo::list(&state.pool, &params, page).await?;
    let total = LawyerRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(lawyers, page, total)))
}

/// GET /api/v1/lawyers/{id}
pub async fn get_lawyer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lawyer>>> {
    let lawyer = LawyerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: lawyer }))
}

/// PUT /api/v1/lawyers/{id}
pub async fn update_lawyer(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLawyer>,
) -> AppResult<Json<DataResponse<Lawyer>>> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::Specializations,
        "specialization",
        input.specialization.as_deref(),
    )?;
    ensure_user(&state, input.user_id).await?;

    let lawyer = LawyerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: lawyer }))
}

/// DELETE /api/v1/lawyers/{id}
///
/// Removes the lawyer from every case team and clears them as lead.
pub async fn delete_lawyer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !LawyerRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(lawyer_id = id, user_id = admin.user_id, "Lawyer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/lawyers/{id}/cases
///
/// Cases the lawyer leads or is on the team of.
pub async fn list_lawyer_cases(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(mut params): Query<CaseQuery>,
) -> AppResult<Json<PaginatedResponse<CaseListItem>>> {
    ensure_lawyer(&state, id).await?;
    params.lawyer_id = Some(id);
    let page = Page::from_params(params.page, params.per_page);
    let cases = CaseRepo::list(&state.pool, &params, page).await?;
    let total = CaseRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(cases, page, total)))
}

/// GET /api/v1/lawyers/{id}/hearings
pub async fn list_lawyer_hearings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(mut params): Query<HearingQuery>,
) -> AppResult<Json<PaginatedResponse<HearingListItem>>> {
    ensure_lawyer(&state, id).await?;
    params.lawyer_id = Some(id);
    let page = Page::from_params(params.page, params.per_page);
    let hearings = HearingRepo::list(&state.pool, &params, page).await?;
    let total = HearingRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(hearings, page, total)))
}
