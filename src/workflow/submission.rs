// src/workflow/submission.rs
use super::{load_job, notifications, require_field, ApplicationWorkflow};
use crate::app_log;
use crate::error::{is_unique_violation, WorkflowError, WorkflowResult};
use crate::repositories::{ApplicationRepository, JobRepository, NotificationRepository};
use crate::types::{Application, ApplicationStatus};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplication {
    #[serde(default)]
    pub candidate_id: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub resume_id: String,
    pub cover_letter: Option<String>,
}

impl ApplicationWorkflow {
    /// Create a Pending application and notify both sides.
    ///
    /// The application row, the job's applicant counter and the two
    /// notifications are written in one transaction.
    pub async fn submit_application(
        &self,
        request: SubmitApplication,
    ) -> WorkflowResult<Application> {
        let candidate_id = require_field(&request.candidate_id, "candidateId")?;
        let job_id = require_field(&request.job_id, "jobId")?;
        let resume_id = require_field(&request.resume_id, "resumeId")?;

        let mut tx = self.db.begin_write().await?;

        let existing = ApplicationRepository::new(&mut *tx)
            .find_by_candidate_and_job(candidate_id, job_id)
            .await?;
        if existing.is_some() {
            app_log!(
                info,
                "Duplicate application rejected: candidate {} job {}",
                candidate_id,
                job_id
            );
            return Err(WorkflowError::DuplicateApplication);
        }

        let job = load_job(&mut *tx, job_id).await?;
        let now = Utc::now();

        if !job.accepts_applications() {
            app_log!(
                info,
                "Application to job {} rejected: status {}",
                job.id,
                job.status
            );
            return Err(WorkflowError::JobUnavailable);
        }

        if self.settings.enforce_application_deadline && job.deadline_passed(now) {
            app_log!(info, "Application to job {} rejected: deadline passed", job.id);
            return Err(WorkflowError::JobUnavailable);
        }

        let application = Application {
            id: uuid::Uuid::new_v4().to_string(),
            candidate_id: candidate_id.to_string(),
            job_id: job.id.clone(),
            resume_id: resume_id.to_string(),
            application_date: now,
            status: ApplicationStatus::Pending,
            cover_letter: request
                .cover_letter
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            note: None,
            last_status_update: now,
        };

        ApplicationRepository::new(&mut *tx)
            .insert(&application)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    WorkflowError::DuplicateApplication
                } else {
                    WorkflowError::from(e)
                }
            })?;

        JobRepository::new(&mut *tx)
            .increment_applicants(&job.id)
            .await?;

        for notification in notifications::submission_notifications(&application, &job) {
            NotificationRepository::new(&mut *tx)
                .insert(&notification)
                .await?;
        }

        tx.commit().await?;

        app_log!(
            info,
            "Candidate {} applied to job {} (application {})",
            application.candidate_id,
            application.job_id,
            application.id
        );
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::super::WorkflowSettings;
    use super::*;
    use crate::types::{JobStatus, PageRequest};
    use chrono::Duration;

    #[tokio::test]
    async fn test_submit_creates_pending_application_and_two_notifications() {
        let fx = Fixture::new().await;

        let application = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.candidate_id, fx.candidate.id);
        assert_eq!(application.cover_letter.as_deref(), Some("Xin chào"));
        assert_eq!(application.application_date, application.last_status_update);
        assert_eq!(fx.count("applications").await, 1);
        assert_eq!(fx.count("notifications").await, 2);

        let to_candidate = fx
            .workflow
            .list_notifications(&fx.candidate.id, false, PageRequest::default())
            .await
            .unwrap();
        let to_employer = fx
            .workflow
            .list_notifications(&fx.employer.id, false, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(to_candidate.data.len(), 1);
        assert_eq!(to_employer.data.len(), 1);
        assert!(to_employer.data[0].message.contains("Rust Engineer"));
        assert_eq!(
            to_employer.data[0].link.as_deref(),
            Some(format!("/employer/jobs/{}/applications", fx.job.id).as_str())
        );
    }

    #[tokio::test]
    async fn test_second_submission_is_duplicate() {
        let fx = Fixture::new().await;
        fx.workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        let err = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::DuplicateApplication));
        assert_eq!(fx.count("applications").await, 1);
        assert_eq!(fx.count("notifications").await, 2);
    }

    #[tokio::test]
    async fn test_inactive_jobs_reject_without_writing() {
        let fx = Fixture::new().await;

        for status in [JobStatus::Closed, JobStatus::Draft, JobStatus::Archived] {
            let job = fx.create_job(status).await;
            let err = fx
                .workflow
                .submit_application(fx.submission(&job.id))
                .await
                .unwrap_err();
            assert!(matches!(err, WorkflowError::JobUnavailable), "{}", status);
            assert_eq!(fx.reload_job(&job.id).await.applicants_count, 0);
        }

        assert_eq!(fx.count("applications").await, 0);
        assert_eq!(fx.count("notifications").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx
            .workflow
            .submit_application(fx.submission("no-such-job"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_fields_are_validation_errors() {
        let fx = Fixture::new().await;
        let mut request = fx.submission(&fx.job.id);
        request.resume_id = "  ".to_string();

        let err = fx.workflow.submit_application(request).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(ref m) if m.contains("resumeId")));
    }

    #[tokio::test]
    async fn test_applicants_count_incremented_once() {
        let fx = Fixture::new().await;
        fx.workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();
        let _ = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await;

        assert_eq!(fx.reload_job(&fx.job.id).await.applicants_count, 1);
    }

    #[tokio::test]
    async fn test_deadline_only_enforced_when_enabled() {
        let lenient = Fixture::new().await;
        let strict = Fixture::with_settings(WorkflowSettings {
            enforce_application_deadline: true,
        })
        .await;

        for fx in [&lenient, &strict] {
            sqlx::query("UPDATE jobs SET application_deadline = ? WHERE id = ?")
                .bind(Utc::now() - Duration::days(1))
                .bind(&fx.job.id)
                .execute(fx.workflow.database().pool())
                .await
                .unwrap();
        }

        assert!(lenient
            .workflow
            .submit_application(lenient.submission(&lenient.job.id))
            .await
            .is_ok());

        let err = strict
            .workflow
            .submit_application(strict.submission(&strict.job.id))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::JobUnavailable));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_from_many_candidates_all_succeed() {
        let fx = Fixture::on_disk().await;

        let mut requests = Vec::new();
        for i in 0..16 {
            let candidate = fx.add_candidate(&format!("ung-vien-{}@example.com", i)).await;
            let mut request = fx.submission(&fx.job.id);
            request.candidate_id = candidate.id;
            requests.push(request);
        }

        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let workflow = fx.workflow.clone();
                tokio::spawn(async move { workflow.submit_application(request).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(fx.count("applications").await, 16);
        assert_eq!(fx.count("notifications").await, 32);
        assert_eq!(fx.reload_job(&fx.job.id).await.applicants_count, 16);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_for_one_pair_yield_one_application() {
        let fx = Fixture::on_disk().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let workflow = fx.workflow.clone();
                let request = fx.submission(&fx.job.id);
                tokio::spawn(async move { workflow.submit_application(request).await })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(WorkflowError::DuplicateApplication) => duplicates += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(fx.count("applications").await, 1);
        assert_eq!(fx.count("notifications").await, 2);
        assert_eq!(fx.reload_job(&fx.job.id).await.applicants_count, 1);
    }
}
