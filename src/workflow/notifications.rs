// src/workflow/notifications.rs
//! Notification fan-out for workflow events, and the polled inbox

use super::ApplicationWorkflow;
use crate::error::{WorkflowError, WorkflowResult};
use crate::repositories::NotificationRepository;
use crate::types::{Application, Job, Notification, NotificationType, Page, PageRequest};

pub fn candidate_application_link(application_id: &str) -> String {
    format!("/candidate/applications/{}", application_id)
}

pub fn employer_applicants_link(job_id: &str) -> String {
    format!("/employer/jobs/{}/applications", job_id)
}

/// Confirmation for the candidate and an alert for the job's employer
pub fn submission_notifications(application: &Application, job: &Job) -> [Notification; 2] {
    [
        Notification::new(
            &application.candidate_id,
            NotificationType::ApplicationStatus,
            format!(
                "Bạn đã nộp đơn ứng tuyển thành công vào vị trí \"{}\"",
                job.title
            ),
            Some(candidate_application_link(&application.id)),
        ),
        Notification::new(
            &job.employer_id,
            NotificationType::ApplicationStatus,
            format!("Có ứng viên mới ứng tuyển vào vị trí \"{}\"", job.title),
            Some(employer_applicants_link(&job.id)),
        ),
    ]
}

/// Message to the candidate after the employer changes the status
pub fn status_change_notification(application: &Application, job: &Job) -> Notification {
    Notification::new(
        &application.candidate_id,
        NotificationType::ApplicationStatus,
        format!(
            "{} (vị trí \"{}\")",
            application.status.candidate_message(),
            job.title
        ),
        Some(candidate_application_link(&application.id)),
    )
}

impl ApplicationWorkflow {
    pub async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        page: PageRequest,
    ) -> WorkflowResult<Page<Notification>> {
        let mut conn = self.db.pool().acquire().await?;
        let (rows, total) = NotificationRepository::new(&mut *conn)
            .list_for_user(user_id, unread_only, page)
            .await?;
        Ok(Page::new(rows, page, total))
    }

    pub async fn unread_notification_count(&self, user_id: &str) -> WorkflowResult<u64> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(NotificationRepository::new(&mut *conn)
            .count_unread(user_id)
            .await?)
    }

    /// Flip one notification to read. Another user's notification is reported
    /// as missing.
    pub async fn mark_notification_read(
        &self,
        notification_id: &str,
        user_id: &str,
    ) -> WorkflowResult<Notification> {
        let mut conn = self.db.pool().acquire().await?;
        NotificationRepository::new(&mut *conn)
            .mark_read(notification_id, user_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Không tìm thấy thông báo"))
    }

    pub async fn mark_all_notifications_read(&self, user_id: &str) -> WorkflowResult<u64> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(NotificationRepository::new(&mut *conn)
            .mark_all_read(user_id)
            .await?)
    }

    pub async fn delete_notification(
        &self,
        notification_id: &str,
        user_id: &str,
    ) -> WorkflowResult<()> {
        let mut conn = self.db.pool().acquire().await?;
        let deleted = NotificationRepository::new(&mut *conn)
            .delete(notification_id, user_id)
            .await?;
        if !deleted {
            return Err(WorkflowError::not_found("Không tìm thấy thông báo"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    #[tokio::test]
    async fn test_inbox_read_flow() {
        let fx = Fixture::new().await;
        fx.workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        let page = fx
            .workflow
            .list_notifications(&fx.candidate.id, false, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(
            fx.workflow
                .unread_notification_count(&fx.candidate.id)
                .await
                .unwrap(),
            1
        );

        let notification_id = page.data[0].id.clone();

        // Another user cannot touch it
        let err = fx
            .workflow
            .mark_notification_read(&notification_id, &fx.employer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));

        let read = fx
            .workflow
            .mark_notification_read(&notification_id, &fx.candidate.id)
            .await
            .unwrap();
        assert!(read.read);

        let unread = fx
            .workflow
            .list_notifications(&fx.candidate.id, true, PageRequest::default())
            .await
            .unwrap();
        assert!(unread.data.is_empty());
        assert_eq!(unread.pagination.total_items, 0);
    }

    #[tokio::test]
    async fn test_mark_all_and_delete() {
        let fx = Fixture::new().await;
        let second_job = fx.create_job(crate::types::JobStatus::Active).await;
        fx.workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();
        fx.workflow
            .submit_application(fx.submission(&second_job.id))
            .await
            .unwrap();

        assert_eq!(
            fx.workflow
                .mark_all_notifications_read(&fx.employer.id)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            fx.workflow
                .unread_notification_count(&fx.employer.id)
                .await
                .unwrap(),
            0
        );

        let page = fx
            .workflow
            .list_notifications(&fx.employer.id, false, PageRequest::default())
            .await
            .unwrap();
        let id = page.data[0].id.clone();
        fx.workflow
            .delete_notification(&id, &fx.employer.id)
            .await
            .unwrap();
        let err = fx
            .workflow
            .delete_notification(&id, &fx.employer.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }
}
