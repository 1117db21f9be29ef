//! Handlers for the `/clients` resource.

use adala_core::error::CoreError;
use adala_core::options::{ensure_valid_opt, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::DbId;
use adala_db::models::client::{Client, ClientQuery, CreateClient, UpdateClient};
use adala_db::models::legal_case::{CaseListItem, CaseQuery};
use adala_db::repositories::{CaseRepo, ClientRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// POST /api/v1/clients
pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::ClientTypes,
        "client_type",
        input.client_type.as_deref(),
    )?;

    let client = ClientRepo::create(&state.pool, &input, Some(auth.user_id)).await?;
    tracing::info!(client_id = client.id, user_id = auth.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/clients
pub async fn list_clients(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ClientQuery>,
) -> AppResult<Json<PaginatedResponse<Client>>> {
    let page = Page::from_params(params.page, params.per_page);
    let clients = ClientRepo::list(&state.pool, &params, page).await?;
    let total = ClientRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(clients, page, total)))
}

/// GET /api/v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::ClientTypes,
        "client_type",
        input.client_type.as_deref(),
    )?;

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Refused while the client still has live cases or invoices.
pub async fn delete_client(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ClientRepo::exists(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let dependents = ClientRepo::count_dependents(&state.pool, id).await?;
    if dependents > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Client has {dependents} case(s) or invoice(s); delete or reassign them first"
        ))));
    }
    if !ClientRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(client_id = id, user_id = user.user_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/clients/{id}/cases
pub async fn list_client_cases(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(mut params): Query<CaseQuery>,
) -> AppResult<Json<PaginatedResponse<CaseListItem>>> {
    if !ClientRepo::exists(&state.pool, id).await? {
        return Err(not_found(id));
    }
    params.client_id = Some(id);
    let page = Page::from_params(params.page, params.per_page);
    let cases = CaseRepo::list(&state.pool, &params, page).await?;
    let total = CaseRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(cases, page, total)))
}
