//! Handlers for `/admin/users`. Every route requires [`RequireAdmin`].

use adala_core::error::CoreError;
use adala_core::options::{ensure_valid_opt, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::DbId;
use adala_db::models::user::{CreateUser, UpdateUser, UserQuery, UserResponse};
use adala_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    pub password: String,
    pub role_id: DbId,
    pub preferred_language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

async fn ensure_role(state: &AppState, role_id: DbId) -> AppResult<()> {
    if RoleRepo::find_by_id(&state.pool, role_id).await?.is_none() {
        return Err(AppError::BadRequest(format!("Unknown role id {role_id}")));
    }
    Ok(())
}

async fn load_response(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_response_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::Languages,
        "preferred_language",
        input.preferred_language.as_deref(),
    )?;
    ensure_role(&state, input.role_id).await?;

    validate_password_strength(&input.password, state.config.min_password_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            full_name: input.full_name,
            password_hash,
            role_id: input.role_id,
            preferred_language: input.preferred_language,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");

    let response = load_response(&state, user.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let page = Page::from_params(params.page, params.per_page);
    let users = UserRepo::list(&state.pool, &params, page).await?;
    let total = UserRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(users, page, total)))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_response(&state, id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Profile fields only; passwords go through `reset-password`.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    ensure_valid_opt(
        OptionKind::Languages,
        "preferred_language",
        input.preferred_language.as_deref(),
    )?;
    if let Some(role_id) = input.role_id {
        ensure_role(&state, role_id).await?;
    }
    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }

    UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    let user = load_response(&state, id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivates the account and revokes its sessions.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(not_found(id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, by = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, state.config.min_password_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(not_found(id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, by = admin.user_id, "Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}
