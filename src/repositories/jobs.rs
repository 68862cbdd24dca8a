// src/repositories/jobs.rs
use crate::app_log;
use crate::types::{Job, JobStatus, SalaryRange};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

const JOB_COLUMNS: &str = r#"
    id, employer_id, title, description, salary_min, salary_max, salary_currency,
    location, job_type, category_id, status, application_deadline,
    views_count, applicants_count, created_at, updated_at
"#;

/// Fields supplied when posting a job
#[derive(Debug, Clone)]
pub struct NewJob {
    pub employer_id: String,
    pub title: String,
    pub description: String,
    pub salary: SalaryRange,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category_id: Option<String>,
    pub status: JobStatus,
    pub application_deadline: Option<DateTime<Utc>>,
}

impl NewJob {
    pub fn new(employer_id: &str, title: &str, status: JobStatus) -> Self {
        Self {
            employer_id: employer_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            salary: SalaryRange::default(),
            location: None,
            job_type: None,
            category_id: None,
            status,
            application_deadline: None,
        }
    }
}

pub struct JobRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> JobRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new_job: NewJob) -> sqlx::Result<Job> {
        let now = Utc::now();
        let job = Job {
            id: uuid::Uuid::new_v4().to_string(),
            employer_id: new_job.employer_id,
            title: new_job.title,
            description: new_job.description,
            salary: new_job.salary,
            location: new_job.location,
            job_type: new_job.job_type,
            category_id: new_job.category_id,
            status: new_job.status,
            application_deadline: new_job.application_deadline,
            views_count: 0,
            applicants_count: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, employer_id, title, description, salary_min, salary_max, salary_currency,
                location, job_type, category_id, status, application_deadline,
                views_count, applicants_count, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.employer_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.salary.min)
        .bind(job.salary.max)
        .bind(&job.salary.currency)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.category_id)
        .bind(job.status)
        .bind(job.application_deadline)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&mut *self.conn)
        .await?;

        app_log!(
            info,
            "Created job '{}' ({}) for employer {}",
            job.title,
            job.id,
            job.employer_id
        );
        Ok(job)
    }

    pub async fn find_by_id(&mut self, id: &str) -> sqlx::Result<Option<Job>> {
        sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    /// List jobs, optionally restricted to one employer
    pub async fn list(&mut self, employer_id: Option<&str>) -> sqlx::Result<Vec<Job>> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE (?1 IS NULL OR employer_id = ?1) ORDER BY created_at DESC",
            JOB_COLUMNS
        ))
        .bind(employer_id)
        .fetch_all(&mut *self.conn)
        .await
    }

    pub async fn set_status(&mut self, id: &str, status: JobStatus) -> sqlx::Result<bool> {
        let result = sqlx::query("UPDATE jobs SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_applicants(&mut self, id: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE jobs SET applicants_count = applicants_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;
    use crate::repositories::UserRepository;
    use crate::types::Role;

    #[tokio::test]
    async fn test_create_list_and_set_status() {
        let db = Database::in_memory().await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let employer = UserRepository::new(&mut conn)
            .create("hr@acme.vn", "Acme HR", Role::Employer)
            .await
            .unwrap();

        let mut repo = JobRepository::new(&mut conn);
        let mut new_job = NewJob::new(&employer.id, "Backend Engineer", JobStatus::Draft);
        new_job.salary = SalaryRange {
            min: Some(1000),
            max: Some(2000),
            currency: Some("USD".into()),
        };
        let job = repo.create(new_job).await.unwrap();

        let loaded = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Backend Engineer");
        assert_eq!(loaded.salary.max, Some(2000));
        assert_eq!(loaded.status, JobStatus::Draft);

        assert!(repo.set_status(&job.id, JobStatus::Active).await.unwrap());
        repo.increment_applicants(&job.id).await.unwrap();
        let loaded = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Active);
        assert_eq!(loaded.applicants_count, 1);

        assert_eq!(repo.list(Some(&employer.id)).await.unwrap().len(), 1);
        assert_eq!(repo.list(Some("someone-else")).await.unwrap().len(), 0);
        assert_eq!(repo.list(None).await.unwrap().len(), 1);
    }
}
