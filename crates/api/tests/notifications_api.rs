//! Inbox endpoints: listing, unread state, manual notifications.

mod common;

use axum::http::StatusCode;
use common::{
    create_client, create_user, delete_auth, expect_json, get_auth, login_as, post_json_auth,
    put_auth, token_for,
};
use sqlx::PgPool;
use stowage_core::notification::{NotificationRecipient, NotificationTemplate, KIND_WARNING};
use stowage_core::types::DbId;
use stowage_db::repositories::NotificationRepo;

fn app(pool: &PgPool) -> axum::Router {
    common::build_test_app(pool.clone())
}

async fn seed(pool: &PgPool, recipient: NotificationRecipient, n: usize) -> Vec<DbId> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let template = NotificationTemplate::new(format!("Note {i}"), "Body", "info");
        ids.push(NotificationRepo::create(pool, recipient, &template).await.unwrap().id);
    }
    ids
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_paginated_newest_first(pool: PgPool) {
    let (user, token) = login_as(&pool, "staff", "staff").await;
    let ids = seed(&pool, NotificationRecipient::User(user.id), 5).await;

    let json = expect_json(
        get_auth(app(&pool), "/api/v1/notifications?page=2&limit=2", &token).await,
        StatusCode::OK,
    )
    .await;
    let page: Vec<DbId> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(page, vec![ids[2], ids[1]]);
    assert_eq!(
        json["pagination"],
        serde_json::json!({ "page": 2, "limit": 2, "total": 5, "totalPages": 3 })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unread_and_type_filters(pool: PgPool) {
    let (user, token) = login_as(&pool, "staff", "staff").await;
    let ids = seed(&pool, NotificationRecipient::User(user.id), 3).await;
    let warning = NotificationTemplate::new("Careful", "Body", KIND_WARNING);
    NotificationRepo::create(&pool, NotificationRecipient::User(user.id), &warning)
        .await
        .unwrap();

    let marked = expect_json(
        put_auth(app(&pool), &format!("/api/v1/notifications/{}/read", ids[0]), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(marked["data"]["isRead"], true);
    assert!(marked["data"]["readAt"].is_string());

    let unread = expect_json(
        get_auth(app(&pool), "/api/v1/notifications?unread=true", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(unread["pagination"]["total"], 3);

    let warnings = expect_json(
        get_auth(app(&pool), "/api/v1/notifications?type=warning", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(warnings["data"].as_array().unwrap().len(), 1);
    assert_eq!(warnings["data"][0]["title"], "Careful");

    let count = expect_json(
        get_auth(app(&pool), "/api/v1/notifications/unread-count", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(count["data"]["count"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn read_all_only_touches_own_inbox(pool: PgPool) {
    let (user, token) = login_as(&pool, "staff", "staff").await;
    let other = create_user(&pool, "other", "staff", None).await;
    seed(&pool, NotificationRecipient::User(user.id), 2).await;
    seed(&pool, NotificationRecipient::User(other.id), 2).await;

    let json = expect_json(
        put_auth(app(&pool), "/api/v1/notifications/read-all", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["markedRead"], 2);

    let others = NotificationRepo::unread_count(&pool, NotificationRecipient::User(other.id))
        .await
        .unwrap();
    assert_eq!(others, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn foreign_notifications_are_invisible(pool: PgPool) {
    let (_user, token) = login_as(&pool, "staff", "staff").await;
    let other = create_user(&pool, "other", "staff", None).await;
    let ids = seed(&pool, NotificationRecipient::User(other.id), 1).await;

    let read = put_auth(app(&pool), &format!("/api/v1/notifications/{}/read", ids[0]), &token).await;
    assert_eq!(read.status(), StatusCode::NOT_FOUND);

    let deleted = delete_auth(app(&pool), &format!("/api/v1/notifications/{}", ids[0]), &token).await;
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);

    let own = delete_auth(
        app(&pool),
        &format!("/api/v1/notifications/{}", ids[0]),
        &token_for(&other),
    )
    .await;
    assert_eq!(own.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_can_address_a_client(pool: PgPool) {
    let (_staff, token) = login_as(&pool, "staff", "staff").await;
    let client = create_client(&pool, "Jane Doe", "jane@x.com").await;
    let client_user = create_user(&pool, "jane", "client", Some(client.id)).await;

    let body = serde_json::json!({
        "clientId": client.id,
        "title": "Key pickup",
        "message": "Your keys are ready.",
    });
    let created = expect_json(
        post_json_auth(app(&pool), "/api/v1/notifications", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["recipientClientId"], client.id);
    assert_eq!(created["data"]["clientId"], client.id);
    assert_eq!(created["data"]["type"], "info");

    let inbox = expect_json(
        get_auth(app(&pool), "/api/v1/notifications", &token_for(&client_user)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(inbox["data"][0]["title"], "Key pickup");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn client_cannot_address_other_clients(pool: PgPool) {
    let jane = create_client(&pool, "Jane Doe", "jane@x.com").await;
    let john = create_client(&pool, "John Roe", "john@x.com").await;
    let jane_user = create_user(&pool, "jane", "client", Some(jane.id)).await;

    let body = serde_json::json!({
        "clientId": john.id,
        "title": "Reminder",
        "message": "Bring the boxes.",
    });
    let created = expect_json(
        post_json_auth(app(&pool), "/api/v1/notifications", body, &token_for(&jane_user)).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["data"]["recipientClientId"], jane.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn manual_notification_needs_title_and_message(pool: PgPool) {
    let (_staff, token) = login_as(&pool, "staff", "staff").await;
    let body = serde_json::json!({ "title": "Only a title" });

    let json = expect_json(
        post_json_auth(app(&pool), "/api/v1/notifications", body, &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["error"], "title and message are required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unlinked_client_account_has_no_inbox(pool: PgPool) {
    let user = create_user(&pool, "orphan", "client", None).await;

    let response = get_auth(app(&pool), "/api/v1/notifications", &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
