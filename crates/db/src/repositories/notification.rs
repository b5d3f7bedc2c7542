use async_trait::async_trait;
use chrono::Utc;
use clubly_core::models::notification::{NewNotification, Notification, NotificationFilter};
use eyre::Result;
use uuid::Uuid;

use super::NotificationRepository;
use crate::{
    models::{convert_all, DbNotification},
    DbPool,
};

pub struct PgNotificationRepository {
    pool: DbPool,
}

impl PgNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<Notification> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbNotification>(
            r#"
            INSERT INTO notifications (id, user_id, type, title, message, related_id, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            RETURNING id, user_id, type, title, message, related_id, read, created_at
            "#,
        )
        .bind(id)
        .bind(&notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.related_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Notification::try_from(row)
    }

    async fn list(&self, filter: NotificationFilter) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, DbNotification>(
            r#"
            SELECT id, user_id, type, title, message, related_id, read, created_at
            FROM notifications
            WHERE user_id = $1
              AND ($2::BOOLEAN IS NULL OR read = $2)
              AND ($3::VARCHAR IS NULL OR type = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.read)
        .bind(filter.kind.map(|kind| kind.as_str()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn count_unread(&self, user_id: String) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_read(&self, user_id: String, ids: Option<Vec<Uuid>>) -> Result<u64> {
        let result = match ids {
            Some(ids) => {
                sqlx::query(
                    r#"
                    UPDATE notifications SET read = TRUE
                    WHERE user_id = $1 AND id = ANY($2)
                    "#,
                )
                .bind(user_id)
                .bind(ids)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: String, id: Option<Uuid>) -> Result<u64> {
        let result = match id {
            Some(id) => {
                sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("DELETE FROM notifications WHERE user_id = $1 AND read")
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }
}
