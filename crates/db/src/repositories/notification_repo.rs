//! Repository for the `notifications` table.
//!
//! Every query is scoped to a single [`NotificationRecipient`]: a row that
//! belongs to someone else behaves as if it did not exist.

use sqlx::postgres::PgExecutor;
use stowage_core::notification::{NotificationRecipient, NotificationTemplate};
use stowage_core::types::DbId;

use crate::models::notification::{Notification, NotificationFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, recipient_user_id, recipient_client_id, client_id, reservation_id, \
                       contract_id, payment_id, title, message, kind, related_entity, is_read, \
                       read_at, created_at, updated_at";

/// Matches rows addressed to the recipient bound at `$1` (user) / `$2` (client).
const RECIPIENT_CLAUSE: &str = "recipient_user_id IS NOT DISTINCT FROM $1 \
                                AND recipient_client_id IS NOT DISTINCT FROM $2";

/// Provides persistence for in-app notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification for one recipient.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
        template: &NotificationTemplate,
    ) -> Result<Notification, sqlx::Error> {
        let (user_id, client_id) = recipient.columns();
        let query = format!(
            "INSERT INTO notifications (recipient_user_id, recipient_client_id, client_id,
                                        reservation_id, contract_id, payment_id,
                                        title, message, kind, related_entity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(client_id)
            .bind(template.client_id)
            .bind(template.reservation_id)
            .bind(template.contract_id)
            .bind(template.payment_id)
            .bind(&template.title)
            .bind(&template.message)
            .bind(&template.kind)
            .bind(&template.related_entity)
            .fetch_one(executor)
            .await
    }

    /// Insert one copy of `template` per recipient in a single statement.
    ///
    /// Either every row is written or none is.
    pub async fn create_many<'e>(
        executor: impl PgExecutor<'e>,
        recipients: &[NotificationRecipient],
        template: &NotificationTemplate,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        if recipients.is_empty() {
            return Ok(Vec::new());
        }
        let (user_ids, client_ids): (Vec<Option<DbId>>, Vec<Option<DbId>>) =
            recipients.iter().map(|r| r.columns()).unzip();

        let query = format!(
            "INSERT INTO notifications (recipient_user_id, recipient_client_id, client_id,
                                        reservation_id, contract_id, payment_id,
                                        title, message, kind, related_entity)
             SELECT r.user_id, r.client_id, $3, $4, $5, $6, $7, $8, $9, $10
             FROM UNNEST($1::BIGINT[], $2::BIGINT[]) AS r(user_id, client_id)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(&user_ids)
            .bind(&client_ids)
            .bind(template.client_id)
            .bind(template.reservation_id)
            .bind(template.contract_id)
            .bind(template.payment_id)
            .bind(&template.title)
            .bind(&template.message)
            .bind(&template.kind)
            .bind(&template.related_entity)
            .fetch_all(executor)
            .await
    }

    /// A page of the recipient's notifications, newest first.
    pub async fn list_for_recipient<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
        filter: &NotificationFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let (user_id, client_id) = recipient.columns();
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE {RECIPIENT_CLAUSE}
               AND ($3::TEXT IS NULL OR kind = $3)
               AND (NOT $4 OR is_read = false)
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(client_id)
            .bind(&filter.kind)
            .bind(filter.unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Total rows matching the same filter, for pagination.
    pub async fn count_for_recipient<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
        filter: &NotificationFilter,
    ) -> Result<i64, sqlx::Error> {
        let (user_id, client_id) = recipient.columns();
        let query = format!(
            "SELECT COUNT(*) FROM notifications
             WHERE {RECIPIENT_CLAUSE}
               AND ($3::TEXT IS NULL OR kind = $3)
               AND (NOT $4 OR is_read = false)"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(user_id)
            .bind(client_id)
            .bind(&filter.kind)
            .bind(filter.unread_only)
            .fetch_one(executor)
            .await
    }

    pub async fn unread_count<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
    ) -> Result<i64, sqlx::Error> {
        Self::count_for_recipient(
            executor,
            recipient,
            &NotificationFilter {
                kind: None,
                unread_only: true,
            },
        )
        .await
    }

    /// Mark one notification read. Returns `None` if it does not belong to
    /// the recipient.
    pub async fn mark_read<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let (user_id, client_id) = recipient.columns();
        let query = format!(
            "UPDATE notifications SET is_read = true, read_at = COALESCE(read_at, NOW())
             WHERE id = $3 AND {RECIPIENT_CLAUSE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(client_id)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Mark every unread notification of the recipient read. Returns the
    /// number of rows changed.
    pub async fn mark_all_read<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
    ) -> Result<u64, sqlx::Error> {
        let (user_id, client_id) = recipient.columns();
        let query = format!(
            "UPDATE notifications SET is_read = true, read_at = NOW()
             WHERE is_read = false AND {RECIPIENT_CLAUSE}"
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(client_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a notification owned by the recipient.
    pub async fn delete<'e>(
        executor: impl PgExecutor<'e>,
        recipient: NotificationRecipient,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (user_id, client_id) = recipient.columns();
        let query = format!("DELETE FROM notifications WHERE id = $3 AND {RECIPIENT_CLAUSE}");
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(client_id)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
