//! Handlers for the `/documents` resource.
//!
//! Documents are metadata records; the file lives in external storage at
//! `file_path`. Each one is attached to a client, case, hearing, invoice or
//! lawyer.

use adala_core::error::CoreError;
use adala_core::options::{ensure_valid, ensure_valid_opt, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::DbId;
use adala_db::models::document::{CreateDocument, Document, DocumentQuery, UpdateDocument};
use adala_db::repositories::{
    CaseRepo, ClientRepo, DocumentRepo, HearingRepo, InvoiceRepo, LawyerRepo,
};
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
        entity: "Document",
        id,
    })
}

/// Whether the live record `(entity_type, entity_id)` exists.
async fn owner_exists(state: &AppState, entity_type: &str, entity_id: DbId) -> AppResult<bool> {
    let pool = &state.pool;
    let exists = match entity_type {
        "client" => ClientRepo::exists(pool, entity_id).await?,
        "case" => CaseRepo::exists(pool, entity_id).await?,
        "hearing" => HearingRepo::exists(pool, entity_id).await?,
        "invoice" => InvoiceRepo::exists(pool, entity_id).await?,
        "lawyer" => LawyerRepo::exists(pool, entity_id).await?,
        _ => false,
    };
    Ok(exists)
}

/// Stored paths are relative to the document store and may not climb out
/// of it.
fn check_file_path(path: &str) -> Result<(), CoreError> {
    let path = path.trim();
    if path.starts_with('/') || path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(CoreError::Validation(
            "file_path must be a relative path inside the document store".into(),
        ));
    }
    Ok(())
}

/// POST /api/v1/documents
pub async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    input.validate()?;
    ensure_valid(
        OptionKind::DocumentEntityTypes,
        "entity_type",
        &input.entity_type,
    )?;
    ensure_valid_opt(
        OptionKind::DocumentTypes,
        "document_type",
        input.document_type.as_deref(),
    )?;
    check_file_path(&input.file_path)?;

    if !owner_exists(&state, &input.entity_type, input.entity_id).await? {
        return Err(AppError::BadRequest(format!(
            "{} with id {} does not exist",
            input.entity_type, input.entity_id
        )));
    }

    let document = DocumentRepo::create(&state.pool, &input, Some(auth.user_id)).await?;
    tracing::info!(
        document_id = document.id,
        entity_type = %document.entity_type,
        entity_id = document.entity_id,
        user_id = auth.user_id,
        "Document registered"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/documents
pub async fn list_documents(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<DocumentQuery>,
) -> AppResult<Json<PaginatedResponse<Document>>> {
    let page = Page::from_params(params.page, params.per_page);
    let documents = DocumentRepo::list(&state.pool, &params, page).await?;
    let total = DocumentRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(documents, page, total)))
}

/// GET /api/v1/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Document>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: document }))
}

/// PUT /api/v1/documents/{id}
pub async fn update_document(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<Json<DataResponse<Document>>> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::DocumentTypes,
        "document_type",
        input.document_type.as_deref(),
    )?;
    let document = DocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DocumentRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(document_id = id, user_id = user.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
