// src/repositories/notifications.rs
use crate::types::{Notification, PageRequest};
use sqlx::SqliteConnection;

pub struct NotificationRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> NotificationRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, notification: &Notification) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, type, message, read, link, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(notification.kind)
        .bind(&notification.message)
        .bind(notification.read)
        .bind(&notification.link)
        .bind(notification.created_at)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    pub async fn list_for_user(
        &mut self,
        user_id: &str,
        unread_only: bool,
        page: PageRequest,
    ) -> sqlx::Result<(Vec<Notification>, u64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND (? = FALSE OR read = FALSE)",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(&mut *self.conn)
        .await?;

        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, type, message, read, link, created_at
            FROM notifications
            WHERE user_id = ? AND (? = FALSE OR read = FALSE)
            ORDER BY created_at DESC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok((rows, total.max(0) as u64))
    }

    pub async fn count_unread(&mut self, user_id: &str) -> sqlx::Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(count.max(0) as u64)
    }

    /// Mark one of the user's notifications as read, returning it
    pub async fn mark_read(
        &mut self,
        id: &str,
        user_id: &str,
    ) -> sqlx::Result<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET read = TRUE
            WHERE id = ? AND user_id = ?
            RETURNING id, user_id, type, message, read, link, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await
    }

    pub async fn mark_all_read(&mut self, user_id: &str) -> sqlx::Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = ? AND read = FALSE")
                .bind(user_id)
                .execute(&mut *self.conn)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&mut self, id: &str, user_id: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
