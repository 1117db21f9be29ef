#![allow(dead_code)]

use std::sync::Arc;

use adala_api::auth::jwt::JwtConfig;
use adala_api::auth::password::hash_password;
use adala_api::config::ServerConfig;
use adala_api::router::build_app_router;
use adala_api::state::AppState;
use adala_core::locale::Lang;
use adala_db::models::user::{CreateUser, User};
use adala_db::repositories::UserRepo;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ADMIN: i64 = adala_core::roles::ROLE_ADMIN_ID;
pub const LAWYER: i64 = adala_core::roles::ROLE_LAWYER_ID;
pub const STAFF: i64 = adala_core::roles::ROLE_STAFF_ID;

/// Password used for every seeded account.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        default_lang: Lang::En,
        min_password_length: 12,
        bootstrap_admin: None,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Full application router over `pool`, with the production middleware.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly through the repository.
pub async fn seed_user(pool: &PgPool, username: &str, role_id: i64) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@adala.test"),
            full_name: Some(format!("{username} test")),
            password_hash,
            role_id,
            preferred_language: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Log in through the API and return the `data` object of the response.
pub async fn login(app: &Router, username: &str, password: &str) -> Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    body_json(response).await["data"].clone()
}

/// Seed a user with the given role and return a fresh access token.
pub async fn token_for(pool: &PgPool, app: &Router, username: &str, role_id: i64) -> String {
    seed_user(pool, username, role_id).await;
    let auth = login(app, username, TEST_PASSWORD).await;
    auth["access_token"]
        .as_str()
        .expect("access_token must be a string")
        .to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should not fail")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("GET", uri, Some(token))).await
}

/// GET with an `Accept-Language` header.
pub async fn get_auth_lang(app: Router, uri: &str, token: &str, lang: &str) -> Response<Body> {
    let mut request = empty_request("GET", uri, Some(token));
    request.headers_mut().insert(
        "accept-language",
        lang.parse().expect("valid header value"),
    );
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

/// POST with no body and no `Content-Type`.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("POST", uri, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request("DELETE", uri, Some(token))).await
}

/// POST expecting `201 Created`; returns the `data` object.
pub async fn create(app: &Router, uri: &str, token: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), uri, token, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {json}");
    json["data"].clone()
}
