// src/repositories/favorites.rs
use crate::types::{FavoriteJob, FavoriteJobWithJob, PageRequest};
use sqlx::SqliteConnection;

pub struct FavoriteRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> FavoriteRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(
        &mut self,
        candidate_id: &str,
        job_id: &str,
    ) -> sqlx::Result<Option<FavoriteJob>> {
        sqlx::query_as::<_, FavoriteJob>(
            r#"
            SELECT id, candidate_id, job_id, created_at
            FROM favorite_jobs
            WHERE candidate_id = ? AND job_id = ?
            "#,
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_optional(&mut *self.conn)
        .await
    }

    pub async fn insert(&mut self, favorite: &FavoriteJob) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO favorite_jobs (id, candidate_id, job_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&favorite.id)
        .bind(&favorite.candidate_id)
        .bind(&favorite.job_id)
        .bind(favorite.created_at)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM favorite_jobs WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A candidate's favorites with their job summary, most recently saved first
    pub async fn list_for_candidate(
        &mut self,
        candidate_id: &str,
        page: PageRequest,
    ) -> sqlx::Result<(Vec<FavoriteJobWithJob>, u64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM favorite_jobs WHERE candidate_id = ?")
                .bind(candidate_id)
                .fetch_one(&mut *self.conn)
                .await?;

        let rows = sqlx::query_as::<_, FavoriteJobWithJob>(
            r#"
            SELECT f.id, f.candidate_id, f.job_id, f.created_at,
                   j.employer_id, j.title AS job_title, j.location AS job_location,
                   j.job_type, j.status AS job_status
            FROM favorite_jobs f
            JOIN jobs j ON j.id = f.job_id
            WHERE f.candidate_id = ?
            ORDER BY f.created_at DESC, f.id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(candidate_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok((rows, total.max(0) as u64))
    }
}
