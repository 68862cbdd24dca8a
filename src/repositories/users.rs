// src/repositories/users.rs
use crate::app_log;
use crate::types::{Role, User};
use crate::utils::normalize_email;
use anyhow::Result;
use chrono::Utc;
use sqlx::SqliteConnection;

pub struct UserRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Create a new user
    pub async fn create(&mut self, email: &str, full_name: &str, role: Role) -> Result<User> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: normalize_email(email),
            full_name: full_name.trim().to_string(),
            role,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&mut *self.conn)
        .await?;

        app_log!(info, "Created {} user {} ({})", user.role, user.email, user.id);
        Ok(user)
    }

    pub async fn find_by_id(&mut self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&mut self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, role, created_at FROM users WHERE email = ?",
        )
        .bind(normalize_email(email))
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(user)
    }

    /// List users, newest first
    pub async fn list(&mut self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, role, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(users)
    }

    /// Delete a user. Their jobs, applications, favorites and notifications
    /// go with them through the foreign keys.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            app_log!(info, "Deleted user {}", id);
        }
        Ok(deleted)
    }
}
