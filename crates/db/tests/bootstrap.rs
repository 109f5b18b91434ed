use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    stowage_db::health_check(&pool).await.unwrap();

    let tables = [
        "clients",
        "users",
        "user_sessions",
        "units",
        "reservations",
        "contracts",
        "payments",
        "notifications",
        "activities",
    ];

    for table in tables {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count, 0, "{table} should start empty");
    }
}

/// The updated_at trigger bumps the column on every UPDATE.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_trigger_fires(pool: PgPool) {
    let (id, created): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "INSERT INTO clients (name, email) VALUES ('A', 'a@example.com')
         RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let (updated,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("UPDATE clients SET notes = 'n' WHERE id = $1 RETURNING updated_at")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(updated >= created);
}
