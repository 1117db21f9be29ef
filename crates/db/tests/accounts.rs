//! Repository integration tests for user accounts: failed-login lockout
//! and refresh session rotation.

use adala_core::roles::ROLE_STAFF_ID;
use adala_db::models::session::CreateSession;
use adala_db::models::user::{CreateUser, User};
use adala_db::repositories::{SessionRepo, UserRepo};
use chrono::{Duration, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@adala.test"),
            full_name: None,
            password_hash: "not-a-real-hash".to_string(),
            role_id: ROLE_STAFF_ID,
            preferred_language: None,
        },
    )
    .await
    .unwrap()
}

fn session(user_id: i64, hash: &str, expires_in: Duration) -> CreateSession {
    CreateSession {
        user_id,
        refresh_token_hash: hash.to_string(),
        expires_at: Utc::now() + expires_in,
        user_agent: None,
        ip_address: None,
    }
}

// ---------------------------------------------------------------------------
// Lockout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn failed_logins_lock_at_the_threshold(pool: PgPool) {
    let user = seed_user(&pool, "counter").await;
    let until = Utc::now() + Duration::minutes(15);

    for expected in 1..3 {
        let count = UserRepo::record_failed_login(&pool, user.id, 3, until)
            .await
            .unwrap();
        assert_eq!(count, expected);
    }
    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.locked_until.is_none());

    let count = UserRepo::record_failed_login(&pool, user.id, 3, until)
        .await
        .unwrap();
    assert_eq!(count, 3);
    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.locked_until.is_some());

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.failed_login_count, 0);
    assert!(stored.locked_until.is_none());
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn refresh_session_is_consumed_once(pool: PgPool) {
    let user = seed_user(&pool, "rotating").await;
    SessionRepo::create(&pool, &session(user.id, "hash-a", Duration::days(7)))
        .await
        .unwrap();

    let consumed = SessionRepo::consume(&pool, "hash-a").await.unwrap().unwrap();
    assert_eq!(consumed.user_id, user.id);
    assert!(consumed.is_revoked);

    assert!(SessionRepo::consume(&pool, "hash-a").await.unwrap().is_none());
    assert!(SessionRepo::consume(&pool, "unknown").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_session_cannot_be_consumed(pool: PgPool) {
    let user = seed_user(&pool, "stale").await;
    SessionRepo::create(&pool, &session(user.id, "hash-old", Duration::days(-1)))
        .await
        .unwrap();

    assert!(SessionRepo::consume(&pool, "hash-old").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn prune_keeps_only_live_sessions(pool: PgPool) {
    let user = seed_user(&pool, "tidy").await;
    let other = seed_user(&pool, "bystander").await;
    for (hash, ttl) in [
        ("live", Duration::days(7)),
        ("used", Duration::days(7)),
        ("expired", Duration::days(-1)),
    ] {
        SessionRepo::create(&pool, &session(user.id, hash, ttl))
            .await
            .unwrap();
    }
    SessionRepo::create(&pool, &session(other.id, "other-used", Duration::days(7)))
        .await
        .unwrap();
    SessionRepo::consume(&pool, "used").await.unwrap();
    SessionRepo::consume(&pool, "other-used").await.unwrap();

    let pruned = SessionRepo::prune_for_user(&pool, user.id).await.unwrap();
    assert_eq!(pruned, 2);
    assert_eq!(SessionRepo::count_active_for_user(&pool, user.id).await.unwrap(), 1);

    // Another user's dead session is untouched.
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE user_id = $1")
            .bind(other.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn revoke_all_ends_every_session(pool: PgPool) {
    let user = seed_user(&pool, "leaver").await;
    for hash in ["one", "two"] {
        SessionRepo::create(&pool, &session(user.id, hash, Duration::days(7)))
            .await
            .unwrap();
    }

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap(), 2);
    assert_eq!(SessionRepo::count_active_for_user(&pool, user.id).await.unwrap(), 0);
    assert!(SessionRepo::consume(&pool, "one").await.unwrap().is_none());
}
