use sqlx::{PgExecutor, PgPool};

use crate::error::{Error, Result};
use crate::models::notification::{NewNotification, SystemNotification};

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, title, content, notification_type, is_read, \
     read_at, related_object_id, related_object_type, created_at";

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a notification on any executor so callers can keep it inside their transaction.
    pub async fn insert<'e, E>(executor: E, new: &NewNotification) -> Result<SystemNotification>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            r#"
            INSERT INTO system_notifications
                (recipient_id, title, content, notification_type, related_object_id, related_object_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, SystemNotification>(&sql)
            .bind(new.recipient_id)
            .bind(&new.title)
            .bind(&new.content)
            .bind(new.notification_type.as_str())
            .bind(new.related_object_id)
            .bind(&new.related_object_type)
            .fetch_one(executor)
            .await?;
        Ok(row)
    }

    pub async fn list(&self, recipient_id: i64) -> Result<Vec<SystemNotification>> {
        let sql = format!(
            "SELECT {} FROM system_notifications WHERE recipient_id = $1 ORDER BY created_at DESC, id DESC",
            NOTIFICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, SystemNotification>(&sql)
            .bind(recipient_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn unread_count(&self, recipient_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM system_notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Marks one notification read. `read_at` keeps its first value on repeat calls.
    pub async fn mark_read(&self, recipient_id: i64, id: i64) -> Result<SystemNotification> {
        let existing = sqlx::query_as::<_, SystemNotification>(&format!(
            "SELECT {} FROM system_notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".into()))?;

        if existing.recipient_id != recipient_id {
            return Err(Error::NotFound("Notification not found".into()));
        }
        if existing.is_read {
            return Ok(existing);
        }

        let sql = format!(
            r#"
            UPDATE system_notifications
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, SystemNotification>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Marks the recipient's unread notifications read, optionally only those in `ids`.
    pub async fn mark_all_read(&self, recipient_id: i64, ids: Option<&[i64]>) -> Result<i64> {
        let result = match ids {
            Some(ids) if !ids.is_empty() => {
                sqlx::query(
                    r#"
                    UPDATE system_notifications
                    SET is_read = TRUE, read_at = NOW()
                    WHERE recipient_id = $1 AND is_read = FALSE AND id = ANY($2)
                    "#,
                )
                .bind(recipient_id)
                .bind(ids)
                .execute(&self.pool)
                .await?
            }
            _ => {
                sqlx::query(
                    r#"
                    UPDATE system_notifications
                    SET is_read = TRUE, read_at = NOW()
                    WHERE recipient_id = $1 AND is_read = FALSE
                    "#,
                )
                .bind(recipient_id)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(result.rows_affected() as i64)
    }
}
