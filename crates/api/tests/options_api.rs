//! Integration tests for the localized option dictionaries and the
//! dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_json, create, get_auth, get_auth_lang, token_for, STAFF};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn options_default_to_english(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = token_for(&pool, &app, "clerk", STAFF).await;

    let response = get_auth(app, "/api/v1/options", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["lang"], "en");
    assert_eq!(data["direction"], "ltr");
    assert_eq!(data["options"]["case_statuses"][0]["value"], "open");
    assert_eq!(data["options"]["case_statuses"][0]["label"], "Open");
    assert!(data["options"]["payment_methods"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn options_follow_requested_language(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = token_for(&pool, &app, "clerk", STAFF).await;

    let by_header = get_auth_lang(app.clone(), "/api/v1/options/case_types", &token, "ar-SA,en;q=0.5").await;
    assert_eq!(by_header.status(), StatusCode::OK);
    let data = body_json(by_header).await["data"].clone();
    assert_eq!(data["lang"], "ar");
    assert_eq!(data["direction"], "rtl");
    assert_eq!(data["items"][0]["value"], "civil");
    assert_eq!(data["items"][0]["label"], "مدني");

    // The query parameter overrides the header.
    let by_query = get_auth_lang(app.clone(), "/api/v1/options/case_types?lang=en", &token, "ar").await;
    let data = body_json(by_query).await["data"].clone();
    assert_eq!(data["items"][0]["label"], "Civil");

    let unknown = get_auth(app, "/api/v1/options/colours", &token).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_stats_summarise_the_practice(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = token_for(&pool, &app, "clerk", STAFF).await;

    let client = create(&app, "/api/v1/clients", &token, json!({ "name": "Acme" })).await;
    for title in ["First", "Second"] {
        create(
            &app,
            "/api/v1/cases",
            &token,
            json!({ "title": title, "client_id": client["id"], "case_type": "labor" }),
        )
        .await;
    }
    let response = get_auth_lang(app, "/api/v1/dashboard/stats", &token, "ar").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["active_clients"], 1);
    assert_eq!(data["open_cases"], 2);
    assert_eq!(data["cases_by_status"][0]["status"], "open");
    assert_eq!(data["cases_by_status"][0]["count"], 2);
    assert_eq!(data["status_labels"]["open"], "مفتوحة");
    assert_eq!(data["overdue_invoices"], 0);
    assert_eq!(data["outstanding_minor"], 0);
}
