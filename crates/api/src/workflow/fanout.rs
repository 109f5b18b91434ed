//! Notification fan-out.

use sqlx::PgConnection;
use stowage_core::notification::{NotificationRecipient, NotificationTemplate};
use stowage_db::models::notification::Notification;
use stowage_db::repositories::{NotificationRepo, UserRepo};

/// Write one copy of `template` per recipient on the caller's connection.
///
/// Runs inside whatever transaction `conn` belongs to, so the rows commit or
/// roll back together with the triggering change.
pub async fn fan_out(
    conn: &mut PgConnection,
    recipients: &[NotificationRecipient],
    template: &NotificationTemplate,
) -> Result<Vec<Notification>, sqlx::Error> {
    let rows = NotificationRepo::create_many(&mut *conn, recipients, template).await?;
    tracing::debug!(
        recipients = recipients.len(),
        kind = %template.kind,
        "Notifications fanned out"
    );
    Ok(rows)
}

/// Fan `template` out to every active admin account.
pub async fn notify_admins(
    conn: &mut PgConnection,
    template: &NotificationTemplate,
) -> Result<Vec<Notification>, sqlx::Error> {
    let admins: Vec<NotificationRecipient> = UserRepo::list_admin_ids(&mut *conn)
        .await?
        .into_iter()
        .map(NotificationRecipient::User)
        .collect();

    if admins.is_empty() {
        tracing::warn!(kind = %template.kind, "No active admin accounts to notify");
    }
    fan_out(conn, &admins, template).await
}

/// Notify a single recipient.
pub async fn notify(
    conn: &mut PgConnection,
    recipient: NotificationRecipient,
    template: &NotificationTemplate,
) -> Result<Notification, sqlx::Error> {
    NotificationRepo::create(&mut *conn, recipient, template).await
}
