//! Integration tests for login, token rotation, lockout and the
//! self-service account endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, login, post_json, post_json_auth, put_json_auth, seed_user, ADMIN,
    LAWYER, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

use adala_db::repositories::UserRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_wrapped_tokens(pool: PgPool) {
    let user = seed_user(&pool, "amal", LAWYER).await;
    let app = common::build_test_app(pool);

    let data = login(&app, "amal", TEST_PASSWORD).await;

    assert!(data["access_token"].is_string());
    assert_eq!(data["refresh_token"].as_str().unwrap().len(), 64);
    assert_eq!(data["token_type"], "Bearer");
    assert_eq!(data["expires_in"], 15 * 60);
    assert_eq!(data["user"]["id"], user.id);
    assert_eq!(data["user"]["role"], "lawyer");
    assert_eq!(data["user"]["preferred_language"], "en");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_credentials_are_indistinguishable(pool: PgPool) {
    seed_user(&pool, "khalid", LAWYER).await;
    let app = common::build_test_app(pool);

    let wrong_pw = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": "khalid", "password": "nope" }),
    )
    .await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw = body_json(wrong_pw).await;

    let ghost = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "ghost", "password": "nope" }),
    )
    .await;
    assert_eq!(ghost.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(ghost).await["error"], wrong_pw["error"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_account_cannot_log_in(pool: PgPool) {
    let user = seed_user(&pool, "former", LAWYER).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "former", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn repeated_failures_lock_the_account(pool: PgPool) {
    seed_user(&pool, "target", LAWYER).await;
    let app = common::build_test_app(pool);

    for _ in 0..adala_api::handlers::auth::MAX_FAILED_ATTEMPTS {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login",
            json!({ "username": "target", "password": "wrong-password" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "target", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_failures_still_lock_the_account(pool: PgPool) {
    let user = seed_user(&pool, "burst", LAWYER).await;
    let app = common::build_test_app(pool.clone());
    let attempts = adala_api::handlers::auth::MAX_FAILED_ATTEMPTS + 3;

    let handles: Vec<_> = (0..attempts)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                post_json(
                    app,
                    "/api/v1/auth/login",
                    json!({ "username": "burst", "password": "wrong-password" }),
                )
                .await
                .status()
            })
        })
        .collect();
    for handle in handles {
        let status = handle.await.unwrap();
        assert!(status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN);
    }

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.locked_until.is_some());

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "burst", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    seed_user(&pool, "rotator", LAWYER).await;
    let app = common::build_test_app(pool);
    let first = login(&app, "rotator", TEST_PASSWORD).await;
    let old_token = first["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": old_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_ne!(data["refresh_token"], first["refresh_token"]);

    // The presented token was revoked by the rotation.
    let reuse = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": old_token }),
    )
    .await;
    assert_eq!(reuse.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    seed_user(&pool, "leaver", LAWYER).await;
    let app = common::build_test_app(pool);
    let auth = login(&app, "leaver", TEST_PASSWORD).await;
    let access = auth["access_token"].as_str().unwrap();

    let response = post_json_auth(app.clone(), "/api/v1/auth/logout", access, json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refresh_token": auth["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_current_user(pool: PgPool) {
    seed_user(&pool, "boss", ADMIN).await;
    let app = common::build_test_app(pool);
    let auth = login(&app, "boss", TEST_PASSWORD).await;

    let response = get_auth(app, "/api/v1/auth/me", auth["access_token"].as_str().unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["username"], "boss");
    assert_eq!(data["role"], "admin");
    assert!(data.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn change_password_flow(pool: PgPool) {
    seed_user(&pool, "changer", LAWYER).await;
    let app = common::build_test_app(pool);
    let auth = login(&app, "changer", TEST_PASSWORD).await;
    let access = auth["access_token"].as_str().unwrap();

    let wrong_current = put_json_auth(
        app.clone(),
        "/api/v1/auth/password",
        access,
        json!({ "current_password": "guess", "new_password": "a-much-longer-secret" }),
    )
    .await;
    assert_eq!(wrong_current.status(), StatusCode::BAD_REQUEST);

    let too_short = put_json_auth(
        app.clone(),
        "/api/v1/auth/password",
        access,
        json!({ "current_password": TEST_PASSWORD, "new_password": "short" }),
    )
    .await;
    assert_eq!(too_short.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(too_short).await["code"], "VALIDATION_ERROR");

    let ok = put_json_auth(
        app.clone(),
        "/api/v1/auth/password",
        access,
        json!({ "current_password": TEST_PASSWORD, "new_password": "a-much-longer-secret" }),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    // Old sessions are gone, the new password works.
    let refresh = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": auth["refresh_token"] }),
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
    login(&app, "changer", "a-much-longer-secret").await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preferences_update_language(pool: PgPool) {
    seed_user(&pool, "polyglot", LAWYER).await;
    let app = common::build_test_app(pool);
    let auth = login(&app, "polyglot", TEST_PASSWORD).await;
    let access = auth["access_token"].as_str().unwrap();

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/preferences",
        access,
        json!({ "preferred_language": "ar" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["preferred_language"], "ar");

    let response = put_json_auth(
        app,
        "/api/v1/auth/preferences",
        access,
        json!({ "preferred_language": "fr" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
