// src/core/database.rs
//! Database connection management and schema migrations

use crate::app_log;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;

/// How long a connection waits on another writer before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owned handle to the connection pool. Constructed once at startup and
/// handed to whoever needs it; cloning shares the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database at `database_url` and run migrations
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let filename = options.get_filename().to_path_buf();
        let options = if filename.as_os_str() != ":memory:" {
            if let Some(parent) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
            // Readers keep going while a writer holds the lock
            options.journal_mode(SqliteJournalMode::Wal)
        } else {
            options
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        app_log!(info, "Database connection established: {}", database_url);

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database on a single long-lived connection
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Start a transaction that holds the write lock from its first statement.
    /// Read-then-write workflows must use this: a deferred transaction gets
    /// SQLITE_BUSY on lock upgrade without waiting on the busy timeout.
    pub async fn begin_write(&self) -> sqlx::Result<Transaction<'static, Sqlite>> {
        self.pool.begin_with("BEGIN IMMEDIATE").await
    }

    /// Get pool reference for custom operations
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('candidate', 'employer', 'admin')),
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                employer_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                salary_min INTEGER,
                salary_max INTEGER,
                salary_currency TEXT,
                location TEXT,
                job_type TEXT,
                category_id TEXT,
                status TEXT NOT NULL DEFAULT 'Draft',
                application_deadline TEXT,
                views_count INTEGER NOT NULL DEFAULT 0,
                applicants_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id TEXT PRIMARY KEY,
                candidate_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                job_id TEXT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                resume_id TEXT NOT NULL,
                application_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Pending',
                cover_letter TEXT,
                note TEXT,
                last_status_update TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS favorite_jobs (
                id TEXT PRIMARY KEY,
                candidate_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                job_id TEXT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                type TEXT NOT NULL,
                message TEXT NOT NULL,
                read BOOLEAN NOT NULL DEFAULT FALSE,
                link TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        // One application and one favorite per (candidate, job)
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_applications_candidate_job ON applications(candidate_id, job_id);",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_favorite_jobs_candidate_job ON favorite_jobs(candidate_id, job_id);",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_applications_job ON applications(job_id);")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_employer ON jobs(employer_id);")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, read);",
        )
        .execute(&self.pool)
        .await?;

        app_log!(info, "Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_migrates_and_is_healthy() {
        let db = Database::in_memory().await.unwrap();
        db.health_check().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();

        for expected in ["applications", "favorite_jobs", "jobs", "notifications", "users"] {
            assert!(names.contains(&expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_uses_wal_and_write_transactions() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("nested/jobs.db").display());
        let db = Database::connect(&url).await.unwrap();

        let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");

        let mut tx = db.begin_write().await.unwrap();
        sqlx::query(
            "INSERT INTO users (id, email, full_name, role, created_at) \
             VALUES ('u1', 'a@example.com', 'A', 'admin', '2026-01-01T00:00:00Z')",
        )
        .execute(&mut *tx)
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
