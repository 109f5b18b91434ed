//! Notification persistence: recipient scoping, fan-out, read state.

use sqlx::PgPool;
use stowage_core::notification::{NotificationRecipient, NotificationTemplate, KIND_INFO, KIND_WARNING};
use stowage_db::models::client::CreateClient;
use stowage_db::models::notification::NotificationFilter;
use stowage_db::models::user::CreateUser;
use stowage_db::repositories::{ClientRepo, NotificationRepo, UserRepo};

async fn user(pool: &PgPool, name: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "x".to_string(),
            role: role.to_string(),
            client_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn template(title: &str) -> NotificationTemplate {
    NotificationTemplate::new(title, "body", KIND_INFO)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_many_writes_one_row_per_recipient(pool: PgPool) {
    let a = user(&pool, "admin1", "admin").await;
    let b = user(&pool, "admin2", "admin").await;

    let rows = NotificationRepo::create_many(
        &pool,
        &[NotificationRecipient::User(a), NotificationRecipient::User(b)],
        &template("Fan-out"),
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    let mut recipients: Vec<_> = rows.iter().map(|n| n.recipient().unwrap()).collect();
    recipients.sort_by_key(|r| r.columns());
    assert!(recipients.contains(&NotificationRecipient::User(a)));
    assert!(recipients.contains(&NotificationRecipient::User(b)));
    assert!(rows.iter().all(|n| n.title == "Fan-out" && !n.is_read));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_many_with_no_recipients_is_noop(pool: PgPool) {
    let rows = NotificationRepo::create_many(&pool, &[], &template("Nobody"))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recipient_check_constraint(pool: PgPool) {
    let err = sqlx::query(
        "INSERT INTO notifications (title, message) VALUES ('orphan', 'no recipient')",
    )
    .execute(&pool)
    .await
    .unwrap_err();

    let constraint = match &err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    };
    assert_eq!(constraint.as_deref(), Some("chk_notifications_single_recipient"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_scoped_to_recipient(pool: PgPool) {
    let me = user(&pool, "me", "staff").await;
    let other = user(&pool, "other", "staff").await;
    let client = ClientRepo::create(
        &pool,
        &CreateClient {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    let mine = NotificationRecipient::User(me);
    NotificationRepo::create(&pool, mine, &template("one")).await.unwrap();
    NotificationRepo::create(&pool, mine, &NotificationTemplate::new("two", "b", KIND_WARNING))
        .await
        .unwrap();
    let foreign = NotificationRepo::create(&pool, NotificationRecipient::User(other), &template("x"))
        .await
        .unwrap();
    NotificationRepo::create(&pool, NotificationRecipient::Client(client.id), &template("c"))
        .await
        .unwrap();

    let filter = NotificationFilter::default();
    let page = NotificationRepo::list_for_recipient(&pool, mine, &filter, 10, 0)
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].title, "two");
    assert_eq!(
        NotificationRepo::count_for_recipient(&pool, mine, &filter).await.unwrap(),
        2
    );

    let warnings = NotificationRepo::list_for_recipient(
        &pool,
        mine,
        &NotificationFilter {
            kind: Some(KIND_WARNING.to_string()),
            unread_only: false,
        },
        10,
        0,
    )
    .await
    .unwrap();
    assert_eq!(warnings.len(), 1);

    let client_rows = NotificationRepo::list_for_recipient(
        &pool,
        NotificationRecipient::Client(client.id),
        &filter,
        10,
        0,
    )
    .await
    .unwrap();
    assert_eq!(client_rows.len(), 1);

    // Another user's notification is invisible.
    assert!(NotificationRepo::mark_read(&pool, mine, foreign.id).await.unwrap().is_none());
    assert!(!NotificationRepo::delete(&pool, mine, foreign.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_read_state(pool: PgPool) {
    let me = NotificationRecipient::User(user(&pool, "reader", "admin").await);
    let first = NotificationRepo::create(&pool, me, &template("a")).await.unwrap();
    NotificationRepo::create(&pool, me, &template("b")).await.unwrap();
    NotificationRepo::create(&pool, me, &template("c")).await.unwrap();
    assert_eq!(NotificationRepo::unread_count(&pool, me).await.unwrap(), 3);

    let read = NotificationRepo::mark_read(&pool, me, first.id).await.unwrap().unwrap();
    assert!(read.is_read);
    assert!(read.read_at.is_some());
    assert_eq!(NotificationRepo::unread_count(&pool, me).await.unwrap(), 2);

    assert_eq!(NotificationRepo::mark_all_read(&pool, me).await.unwrap(), 2);
    assert_eq!(NotificationRepo::unread_count(&pool, me).await.unwrap(), 0);

    assert!(NotificationRepo::delete(&pool, me, first.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_pagination(pool: PgPool) {
    let me = NotificationRecipient::User(user(&pool, "pager", "admin").await);
    for i in 0..5 {
        NotificationRepo::create(&pool, me, &template(&format!("n{i}")))
            .await
            .unwrap();
    }
    let filter = NotificationFilter::default();
    let page2 = NotificationRepo::list_for_recipient(&pool, me, &filter, 2, 2)
        .await
        .unwrap();
    assert_eq!(page2.len(), 2);
    let last = NotificationRepo::list_for_recipient(&pool, me, &filter, 2, 4)
        .await
        .unwrap();
    assert_eq!(last.len(), 1);
}
