// src/repositories/applications.rs
use crate::types::{Application, ApplicationStatus, ApplicationWithJob, PageRequest};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

const APPLICATION_COLUMNS: &str = "id, candidate_id, job_id, resume_id, application_date, status, cover_letter, note, last_status_update";

const APPLICATION_WITH_JOB_SELECT: &str = r#"
    SELECT a.id, a.candidate_id, a.job_id, a.resume_id, a.application_date, a.status,
           a.cover_letter, a.note, a.last_status_update,
           j.employer_id, j.title AS job_title, j.location AS job_location,
           j.job_type, j.status AS job_status
    FROM applications a
    JOIN jobs j ON j.id = a.job_id
"#;

/// Which applications a listing covers
#[derive(Debug, Clone, Copy)]
pub enum ApplicationScope<'a> {
    Candidate(&'a str),
    Job(&'a str),
}

pub struct ApplicationRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ApplicationRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, application: &Application) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (
                id, candidate_id, job_id, resume_id, application_date, status,
                cover_letter, note, last_status_update
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.candidate_id)
        .bind(&application.job_id)
        .bind(&application.resume_id)
        .bind(application.application_date)
        .bind(application.status)
        .bind(&application.cover_letter)
        .bind(&application.note)
        .bind(application.last_status_update)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&mut self, id: &str) -> sqlx::Result<Option<Application>> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await
    }

    pub async fn find_by_candidate_and_job(
        &mut self,
        candidate_id: &str,
        job_id: &str,
    ) -> sqlx::Result<Option<Application>> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE candidate_id = ? AND job_id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(candidate_id)
        .bind(job_id)
        .fetch_optional(&mut *self.conn)
        .await
    }

    /// Persist a status change. `note` of `None` leaves the stored note untouched.
    pub async fn update_status(
        &mut self,
        id: &str,
        status: ApplicationStatus,
        note: Option<&str>,
        last_status_update: DateTime<Utc>,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET status = ?, note = COALESCE(?, note), last_status_update = ?
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(note)
        .bind(last_status_update)
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// One page of applications with their job summary, newest first.
    /// An empty `statuses` slice means no status filter.
    pub async fn list(
        &mut self,
        scope: ApplicationScope<'_>,
        statuses: &[ApplicationStatus],
        page: PageRequest,
    ) -> sqlx::Result<(Vec<ApplicationWithJob>, u64)> {
        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM applications a");
        push_filters(&mut count_query, scope, statuses);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&mut *self.conn)
            .await?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(APPLICATION_WITH_JOB_SELECT);
        push_filters(&mut query, scope, statuses);
        query
            .push(" ORDER BY a.application_date DESC, a.id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = query
            .build_query_as::<ApplicationWithJob>()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok((rows, total.max(0) as u64))
    }
}

fn push_filters(
    query: &mut QueryBuilder<'_, Sqlite>,
    scope: ApplicationScope<'_>,
    statuses: &[ApplicationStatus],
) {
    match scope {
        ApplicationScope::Candidate(candidate_id) => {
            query
                .push(" WHERE a.candidate_id = ")
                .push_bind(candidate_id.to_string());
        }
        ApplicationScope::Job(job_id) => {
            query.push(" WHERE a.job_id = ").push_bind(job_id.to_string());
        }
    }

    if !statuses.is_empty() {
        query.push(" AND a.status IN (");
        let mut separated = query.separated(", ");
        for status in statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");
    }
}
