use sqlx::PgPool;

/// Connect, migrate, verify schema and seed data.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    adala_db::health_check(&pool).await.unwrap();

    let tables = [
        "roles",
        "users",
        "user_sessions",
        "clients",
        "lawyers",
        "cases",
        "case_lawyers",
        "hearings",
        "invoices",
        "invoice_items",
        "payments",
        "documents",
    ];
    for table in tables {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|e| panic!("{table} lookup failed: {e}"));
        assert!(exists, "{table} should exist");
    }
}

/// Role ids are fixed because the API refers to them by constant.
#[sqlx::test(migrations = "./migrations")]
async fn test_roles_are_seeded_with_fixed_ids(pool: PgPool) {
    use adala_core::roles::*;
    use adala_db::repositories::RoleRepo;

    let roles = RoleRepo::list(&pool).await.unwrap();
    let pairs: Vec<(i64, &str)> = roles.iter().map(|r| (r.id, r.name.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            (ROLE_ADMIN_ID, ROLE_ADMIN),
            (ROLE_LAWYER_ID, ROLE_LAWYER),
            (ROLE_STAFF_ID, ROLE_STAFF)
        ]
    );
    assert_eq!(RoleRepo::resolve_name(&pool, 99).await.unwrap(), "unknown");
}

/// Every table carrying `updated_at` has the shared trigger.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_triggers_installed(pool: PgPool) {
    let missing: Vec<String> = sqlx::query_scalar(
        "SELECT c.table_name::text FROM information_schema.columns c
         WHERE c.column_name = 'updated_at' AND c.table_schema = 'public'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.triggers t
               WHERE t.event_object_table = c.table_name AND t.trigger_name = 'set_updated_at'
           )",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(missing.is_empty(), "tables without trigger: {missing:?}");
}
