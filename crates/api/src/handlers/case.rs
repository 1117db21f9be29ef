//! Handlers for the `/cases` resource, its status workflow and its team.

use adala_core::case_status;
use adala_core::error::CoreError;
use adala_core::options::{ensure_valid, ensure_valid_opt, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::DbId;
use adala_db::models::document::{Document, DocumentQuery};
use adala_db::models::hearing::{HearingListItem, HearingQuery};
use adala_db::models::invoice::{InvoiceListItem, InvoiceQuery};
use adala_db::models::legal_case::{
    AssignLawyer, CaseLawyer, CaseListItem, CaseQuery, ChangeCaseStatus, CreateCase, UpdateCase,
};
use adala_db::repositories::{
    CaseRepo, ClientRepo, DocumentRepo, HearingRepo, InvoiceRepo, LawyerRepo,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Datelike;
use validator::Validate;

use super::{missing_reference, today};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Team role given when `POST /cases/{id}/lawyers` names none.
const DEFAULT_TEAM_ROLE: &str = "associate";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Case", id })
}

async fn ensure_case(state: &AppState, id: DbId) -> AppResult<()> {
    if CaseRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<CaseListItem> {
    CaseRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/cases
///
/// The case number is generated as `CASE-<year>-<seq>` unless supplied.
pub async fn create_case(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateCase>,
) -> AppResult<(StatusCode, Json<DataResponse<CaseListItem>>)> {
    input.validate()?;
    ensure_valid(OptionKind::CaseTypes, "case_type", &input.case_type)?;
    ensure_valid_opt(
        OptionKind::CasePriorities,
        "priority",
        input.priority.as_deref(),
    )?;

    if !ClientRepo::exists(&state.pool, input.client_id).await? {
        return Err(missing_reference("Client", input.client_id));
    }
    if let Some(lawyer_id) = input.lead_lawyer_id {
        if !LawyerRepo::exists(&state.pool, lawyer_id).await? {
            return Err(missing_reference("Lawyer", lawyer_id));
        }
    }

    let opened_on = input.opened_on.unwrap_or_else(today);
    let case_number = match input.case_number.as_deref().map(str::trim) {
        Some(number) if !number.is_empty() => number.to_string(),
        _ => CaseRepo::next_case_number(&state.pool, opened_on.year()).await?,
    };

    let case = CaseRepo::create(&state.pool, &case_number, &input, Some(auth.user_id)).await?;
    tracing::info!(
        case_id = case.id,
        case_number = %case.case_number,
        user_id = auth.user_id,
        "Case created"
    );

    let detail = load_detail(&state, case.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/cases
pub async fn list_cases(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<CaseQuery>,
) -> AppResult<Json<PaginatedResponse<CaseListItem>>> {
    let page = Page::from_params(params.page, params.per_page);
    let cases = CaseRepo::list(&state.pool, &params, page).await?;
    let total = CaseRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(cases, page, total)))
}

/// GET /api/v1/cases/{id}
pub async fn get_case(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CaseListItem>>> {
    let case = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: case }))
}

/// PUT /api/v1/cases/{id}
///
/// A case with invoices keeps its client, and the opening date may not
/// move past a recorded closing date.
pub async fn update_case(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCase>,
) -> AppResult<Json<DataResponse<CaseListItem>>> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::CaseTypes,
        "case_type",
        input.case_type.as_deref(),
    )?;
    ensure_valid_opt(
        OptionKind::CasePriorities,
        "priority",
        input.priority.as_deref(),
    )?;

    let current = CaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(client_id) = input.client_id.filter(|c| *c != current.client_id) {
        if !ClientRepo::exists(&state.pool, client_id).await? {
            return Err(missing_reference("Client", client_id));
        }
        let invoices = CaseRepo::count_invoices(&state.pool, id).await?;
        if invoices > 0 {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Case has {invoices} invoice(s) billed to its client; it cannot move to another client"
            ))));
        }
    }
    if let (Some(opened_on), Some(closed_on)) = (input.opened_on, current.closed_on) {
        if opened_on > closed_on {
            return Err(AppError::Core(CoreError::Validation(
                "Opening date cannot be after the closing date".into(),
            )));
        }
    }
    if let Some(lawyer_id) = input.lead_lawyer_id {
        if !LawyerRepo::exists(&state.pool, lawyer_id).await? {
            return Err(missing_reference("Lawyer", lawyer_id));
        }
    }

    CaseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    let case = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: case }))
}

/// DELETE /api/v1/cases/{id}
///
/// Refused while invoices are billed against the case. Hearings go with it.
pub async fn delete_case(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_case(&state, id).await?;
    let invoices = CaseRepo::count_invoices(&state.pool, id).await?;
    if invoices > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Case has {invoices} invoice(s); delete or cancel them first"
        ))));
    }
    if !CaseRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(case_id = id, user_id = user.user_id, "Case deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/cases/{id}/status
///
/// Closing stamps `closed_on` (today unless given); reopening clears it.
pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeCaseStatus>,
) -> AppResult<Json<DataResponse<CaseListItem>>> {
    ensure_valid(OptionKind::CaseStatuses, "status", &input.status)?;

    let current = CaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    case_status::check_transition(&current.status, &input.status)?;

    let closed_on = if case_status::is_closed(&input.status) {
        let day = input.closed_on.or(current.closed_on).unwrap_or_else(today);
        if day < current.opened_on {
            return Err(AppError::Core(CoreError::Validation(
                "Closing date cannot be before the opening date".into(),
            )));
        }
        Some(day)
    } else {
        None
    };

    CaseRepo::change_status(&state.pool, id, &input.status, closed_on)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        case_id = id,
        from = %current.status,
        to = %input.status,
        user_id = auth.user_id,
        "Case status changed"
    );

    let case = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: case }))
}

/// GET /api/v1/cases/{id}/lawyers
pub async fn list_team(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CaseLawyer>>>> {
    ensure_case(&state, id).await?;
    let team = CaseRepo::list_team(&state.pool, id).await?;
    Ok(Json(DataResponse { data: team }))
}

/// POST /api/v1/cases/{id}/lawyers
///
/// Adds the lawyer or changes their role; returns the updated team.
pub async fn assign_lawyer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AssignLawyer>,
) -> AppResult<Json<DataResponse<Vec<CaseLawyer>>>> {
    let role = input.role.as_deref().unwrap_or(DEFAULT_TEAM_ROLE);
    ensure_valid(OptionKind::LawyerRoles, "role", role)?;
    ensure_case(&state, id).await?;
    if !LawyerRepo::exists(&state.pool, input.lawyer_id).await? {
        return Err(missing_reference("Lawyer", input.lawyer_id));
    }

    CaseRepo::assign_lawyer(&state.pool, id, input.lawyer_id, role).await?;
    let team = CaseRepo::list_team(&state.pool, id).await?;
    Ok(Json(DataResponse { data: team }))
}

/// DELETE /api/v1/cases/{id}/lawyers/{lawyer_id}
pub async fn unassign_lawyer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, lawyer_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_case(&state, id).await?;
    if !CaseRepo::unassign_lawyer(&state.pool, id, lawyer_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Case lawyer",
            id: lawyer_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/cases/{id}/hearings
pub async fn list_case_hearings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(mut params): Query<HearingQuery>,
) -> AppResult<Json<PaginatedResponse<HearingListItem>>> {
    ensure_case(&state, id).await?;
    params.case_id = Some(id);
    let page = Page::from_params(params.page, params.per_page);
    let hearings = HearingRepo::list(&state.pool, &params, page).await?;
    let total = HearingRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(hearings, page, total)))
}

/// GET /api/v1/cases/{id}/invoices
pub async fn list_case_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(mut params): Query<InvoiceQuery>,
) -> AppResult<Json<PaginatedResponse<InvoiceListItem>>> {
    ensure_case(&state, id).await?;
    params.case_id = Some(id);
    let page = Page::from_params(params.page, params.per_page);
    let day = today();
    let invoices = InvoiceRepo::list(&state.pool, &params, page)
        .await?
        .into_iter()
        .map(|mut item| {
            item.invoice = item.invoice.present(day);
            item
        })
        .collect();
    let total = InvoiceRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(invoices, page, total)))
}

/// GET /api/v1/cases/{id}/documents
pub async fn list_case_documents(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(mut params): Query<DocumentQuery>,
) -> AppResult<Json<PaginatedResponse<Document>>> {
    ensure_case(&state, id).await?;
    params.entity_type = Some("case".into());
    params.entity_id = Some(id);
    let page = Page::from_params(params.page, params.per_page);
    let documents = DocumentRepo::list(&state.pool, &params, page).await?;
    let total = DocumentRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(documents, page, total)))
}
