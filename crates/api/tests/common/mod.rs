#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stowage_api::auth::jwt::{generate_access_token, JwtConfig};
use stowage_api::auth::password::hash_password;
use stowage_api::config::ServerConfig;
use stowage_api::router::build_app_router;
use stowage_api::state::AppState;
use stowage_core::types::DbId;
use stowage_db::models::client::{Client, CreateClient};
use stowage_db::models::unit::{CreateUnit, Unit};
use stowage_db::models::user::{CreateUser, User};
use stowage_db::repositories::{ClientRepo, UnitRepo, UserRepo};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, with the production middleware
/// stack, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// POST a raw body labelled as JSON, for payloads `serde_json` cannot build.
pub async fn post_raw_json(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status, then parse the body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    role: &str,
    client_id: Option<DbId>,
) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
            client_id,
        },
    )
    .await
    .unwrap()
}

/// Mint an access token for `user` without going through login.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, user.client_id, &test_config().jwt).unwrap()
}

/// Create a user with `role` and return it with a valid token.
pub async fn login_as(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = create_user(pool, username, role, None).await;
    let token = token_for(&user);
    (user, token)
}

pub async fn create_unit(pool: &PgPool, monthly_rate: f64, status: &str) -> Unit {
    UnitRepo::create(
        pool,
        &CreateUnit {
            unit_type: "3-4m2".to_string(),
            monthly_rate,
            status: Some(status.to_string()),
            client_id: None,
            address_street: Some("Calle Mayor 1".to_string()),
            city: Some("Madrid".to_string()),
            province: None,
            country: Some("ES".to_string()),
            postal_code: Some("28001".to_string()),
            latitude: None,
            longitude: None,
        },
        None,
    )
    .await
    .unwrap()
}

pub async fn create_client(pool: &PgPool, name: &str, email: &str) -> Client {
    ClientRepo::create(
        pool,
        &CreateClient {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("600000000".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap()
}

/// Booking widget payload for Jane Doe.
pub fn jane_doe(unit_id: DbId) -> serde_json::Value {
    serde_json::json!({
        "unitId": unit_id,
        "location": "Madrid Norte",
        "type": "particular",
        "size": "3-4m2",
        "entryDate": "2026-11-01",
        "goodsValue": "<5000",
        "postalCode": "28001",
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@x.com",
        "phone": "600123123",
    })
}

pub async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await.unwrap()
}
