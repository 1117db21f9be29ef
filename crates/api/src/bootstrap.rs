//! First-run setup: create the initial administrator account.

use adala_core::locale::Lang;
use adala_core::roles::ROLE_ADMIN_ID;
use adala_db::models::user::CreateUser;
use adala_db::repositories::UserRepo;
use adala_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Create the configured administrator when the users table is empty.
///
/// Returns `true` when an account was created. Does nothing once any user
/// exists, so restarting with the `ADMIN_*` variables still set is harmless.
pub async fn ensure_admin(pool: &DbPool, config: &ServerConfig) -> AppResult<bool> {
    let Some(admin) = &config.bootstrap_admin else {
        return Ok(false);
    };

    if UserRepo::count_all(pool).await? > 0 {
        tracing::debug!("Users exist, skipping admin bootstrap");
        return Ok(false);
    }

    validate_password_strength(&admin.password, config.min_password_length)
        .map_err(|msg| AppError::BadRequest(format!("ADMIN_PASSWORD: {msg}")))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.trim().to_string(),
            email: admin.email.trim().to_lowercase(),
            full_name: None,
            password_hash,
            role_id: ROLE_ADMIN_ID,
            preferred_language: Some(config.default_lang.code().to_string()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created initial admin account");
    Ok(true)
}
