//! HTTP-level tests for registration, login, token refresh, logout and RBAC.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_client, create_user, expect_json, get, get_auth, login_as, post_json,
    post_json_auth, token_for, TEST_PASSWORD,
};
use sqlx::PgPool;
use stowage_db::models::user::UpdateUser;
use stowage_db::repositories::UserRepo;

async fn login(pool: &PgPool, email: &str, password: &str) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": email, "password": password });
    post_json(app, "/api/v1/auth/login", body).await
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_creates_client_account_with_tokens(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "username": "jane",
        "email": "Jane@X.com",
        "password": "long-enough-pw",
    });

    let json = expect_json(post_json(app, "/api/v1/auth/register", body).await, StatusCode::CREATED).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["role"], "client");
    assert_eq!(json["user"]["email"], "jane@x.com");
    assert!(json["user"]["clientId"].is_null());
    assert!(json["user"].get("passwordHash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_links_existing_client_by_email(pool: PgPool) {
    let client = create_client(&pool, "Jane Doe", "jane@x.com").await;
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "username": "jane",
        "email": "jane@x.com",
        "password": "long-enough-pw",
    });

    let json = expect_json(post_json(app, "/api/v1/auth/register", body).await, StatusCode::CREATED).await;
    assert_eq!(json["user"]["clientId"], client.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_duplicates_and_weak_passwords(pool: PgPool) {
    create_user(&pool, "taken", "staff", None).await;

    let duplicate_email = serde_json::json!({
        "username": "someone",
        "email": "taken@test.com",
        "password": "long-enough-pw",
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/register",
        duplicate_email,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let duplicate_username = serde_json::json!({
        "username": "taken",
        "email": "fresh@test.com",
        "password": "long-enough-pw",
    });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/register",
        duplicate_username,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let weak = serde_json::json!({
        "username": "weak",
        "email": "weak@test.com",
        "password": "short",
    });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/register", weak).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_tokens_and_user(pool: PgPool) {
    let user = create_user(&pool, "admin", "admin", None).await;

    let json = expect_json(login(&pool, "admin@test.com", TEST_PASSWORD).await, StatusCode::OK).await;

    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "admin");

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_credentials_are_401(pool: PgPool) {
    create_user(&pool, "admin", "admin", None).await;

    let json = expect_json(
        login(&pool, "admin@test.com", "wrong-password").await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["error"], "Invalid credentials");

    let response = login(&pool, "nobody@test.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_account_is_403(pool: PgPool) {
    let user = create_user(&pool, "former", "staff", None).await;
    UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = login(&pool, "former@test.com", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    create_user(&pool, "staff", "staff", None).await;
    let json = body_json(login(&pool, "staff@test.com", TEST_PASSWORD).await).await;
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        body.clone(),
    )
    .await;
    let rotated = expect_json(response, StatusCode::OK).await;
    assert_ne!(rotated["refresh_token"], json["refresh_token"]);

    let reused = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/refresh", body).await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "staff", "staff", None).await;
    let json = body_json(login(&pool, "staff@test.com", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        serde_json::json!({}),
        access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": json["refresh_token"] });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_the_caller(pool: PgPool) {
    let (user, token) = login_as(&pool, "staff", "staff").await;

    let app = common::build_test_app(pool);
    let json = expect_json(get_auth(app, "/api/v1/auth/me", &token).await, StatusCode::OK).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["username"], "staff");
}

// ---------------------------------------------------------------------------
// Token handling and RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_routes_need_a_valid_bearer_token(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), "/api/v1/units").await;
    let json = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/units", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn client_role_cannot_reach_back_office(pool: PgPool) {
    let client = create_client(&pool, "Jane Doe", "jane@x.com").await;
    let user = create_user(&pool, "jane", "client", Some(client.id)).await;
    let token = token_for(&user);

    for uri in ["/api/v1/units", "/api/v1/clients", "/api/v1/contracts", "/api/v1/payments"] {
        let response = get_auth(common::build_test_app(pool.clone()), uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
