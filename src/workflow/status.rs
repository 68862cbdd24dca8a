// src/workflow/status.rs
use super::{notifications, require_field, ApplicationWorkflow};
use crate::app_log;
use crate::error::{WorkflowError, WorkflowResult};
use crate::repositories::{ApplicationRepository, JobRepository, NotificationRepository};
use crate::types::{Application, ApplicationStatus};
use chrono::Utc;

impl ApplicationWorkflow {
    /// Move an application to `status` on behalf of the employer owning its job.
    ///
    /// Any status may follow any other. `lastStatusUpdate` never moves
    /// backwards, and the candidate is notified in the same transaction.
    pub async fn update_application_status(
        &self,
        application_id: &str,
        employer_id: &str,
        status: ApplicationStatus,
        note: Option<String>,
    ) -> WorkflowResult<Application> {
        let application_id = require_field(application_id, "applicationId")?;
        let employer_id = require_field(employer_id, "employerId")?;

        let mut tx = self.db.begin_write().await?;

        let mut application = ApplicationRepository::new(&mut *tx)
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Không tìm thấy đơn ứng tuyển"))?;

        let job = JobRepository::new(&mut *tx)
            .find_by_id(&application.job_id)
            .await?
            .filter(|job| job.employer_id == employer_id);

        let Some(job) = job else {
            app_log!(
                warn,
                "Employer {} may not update application {}",
                employer_id,
                application_id
            );
            return Err(WorkflowError::Forbidden);
        };

        let previous = application.status;
        application.status = status;
        application.last_status_update = Utc::now().max(application.last_status_update);
        if let Some(note) = note {
            application.note = Some(note);
        }

        ApplicationRepository::new(&mut *tx)
            .update_status(
                &application.id,
                application.status,
                application.note.as_deref(),
                application.last_status_update,
            )
            .await?;

        NotificationRepository::new(&mut *tx)
            .insert(&notifications::status_change_notification(&application, &job))
            .await?;

        tx.commit().await?;

        app_log!(
            info,
            "Application {} moved from {} to {} by employer {}",
            application.id,
            previous,
            application.status,
            employer_id
        );
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::types::PageRequest;
    use chrono::Duration;

    #[tokio::test]
    async fn test_owner_moves_application_to_interviewing() {
        let fx = Fixture::new().await;
        let submitted = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        let updated = fx
            .workflow
            .update_application_status(
                &submitted.id,
                &fx.employer.id,
                ApplicationStatus::Interviewing,
                Some("Phone screen on Monday".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ApplicationStatus::Interviewing);
        assert_eq!(updated.note.as_deref(), Some("Phone screen on Monday"));
        assert!(updated.last_status_update >= submitted.last_status_update);

        let inbox = fx
            .workflow
            .list_notifications(&fx.candidate.id, false, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(inbox.data.len(), 2);
        assert!(inbox.data.iter().any(|n| n.message.contains("phỏng vấn")));
        assert_eq!(fx.count("notifications").await, 3);
    }

    #[tokio::test]
    async fn test_other_employer_is_forbidden_and_nothing_changes() {
        let fx = Fixture::new().await;
        let submitted = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        let err = fx
            .workflow
            .update_application_status(
                &submitted.id,
                &fx.other_employer.id,
                ApplicationStatus::Interviewing,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));

        let history = fx
            .workflow
            .get_application_history(&fx.candidate.id, None, PageRequest::default())
            .await
            .unwrap();
        let stored = &history.data[0].application;
        assert_eq!(stored.status, ApplicationStatus::Pending);
        assert_eq!(stored.note, None);
        assert_eq!(fx.count("notifications").await, 2);
    }

    #[tokio::test]
    async fn test_missing_application_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx
            .workflow
            .update_application_status(
                "missing",
                &fx.employer.id,
                ApplicationStatus::Reviewed,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_any_transition_allowed_and_note_kept() {
        let fx = Fixture::new().await;
        let submitted = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        fx.workflow
            .update_application_status(
                &submitted.id,
                &fx.employer.id,
                ApplicationStatus::Hired,
                Some("Strong hire".to_string()),
            )
            .await
            .unwrap();

        let back = fx
            .workflow
            .update_application_status(
                &submitted.id,
                &fx.employer.id,
                ApplicationStatus::Pending,
                None,
            )
            .await
            .unwrap();

        assert_eq!(back.status, ApplicationStatus::Pending);
        assert_eq!(back.note.as_deref(), Some("Strong hire"));
    }

    #[tokio::test]
    async fn test_last_status_update_never_moves_backwards() {
        let fx = Fixture::new().await;
        let submitted = fx
            .workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        // Simulate a stored timestamp ahead of this host's clock
        let future = Utc::now() + Duration::hours(1);
        sqlx::query("UPDATE applications SET last_status_update = ? WHERE id = ?")
            .bind(future)
            .bind(&submitted.id)
            .execute(fx.workflow.database().pool())
            .await
            .unwrap();

        let updated = fx
            .workflow
            .update_application_status(
                &submitted.id,
                &fx.employer.id,
                ApplicationStatus::Reviewed,
                None,
            )
            .await
            .unwrap();
        assert!(updated.last_status_update > Utc::now() + Duration::minutes(30));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_all_commit() {
        let fx = Fixture::on_disk().await;

        let mut application_ids = Vec::new();
        for i in 0..8 {
            let candidate = fx.add_candidate(&format!("ung-vien-{}@example.com", i)).await;
            let mut request = fx.submission(&fx.job.id);
            request.candidate_id = candidate.id;
            application_ids.push(fx.workflow.submit_application(request).await.unwrap().id);
        }

        let handles: Vec<_> = application_ids
            .into_iter()
            .map(|id| {
                let workflow = fx.workflow.clone();
                let employer_id = fx.employer.id.clone();
                tokio::spawn(async move {
                    workflow
                        .update_application_status(
                            &id,
                            &employer_id,
                            ApplicationStatus::Reviewed,
                            None,
                        )
                        .await
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().status, ApplicationStatus::Reviewed);
        }

        // 2 per submission, 1 per status change
        assert_eq!(fx.count("notifications").await, 24);
    }
}
