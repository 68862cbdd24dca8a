// src/workflow/retrieval.rs
use super::{load_job, ApplicationWorkflow};
use crate::error::{WorkflowError, WorkflowResult};
use crate::repositories::{ApplicationRepository, ApplicationScope, FavoriteRepository};
use crate::types::{ApplicationStatus, ApplicationWithJob, FavoriteJobWithJob, Page, PageRequest};

impl ApplicationWorkflow {
    pub async fn get_favorite_jobs(
        &self,
        candidate_id: &str,
        page: PageRequest,
    ) -> WorkflowResult<Page<FavoriteJobWithJob>> {
        let mut conn = self.db.pool().acquire().await?;
        let (rows, total) = FavoriteRepository::new(&mut *conn)
            .list_for_candidate(candidate_id, page)
            .await?;
        Ok(Page::new(rows, page, total))
    }

    /// Every application of a candidate, optionally narrowed to one status
    pub async fn get_application_history(
        &self,
        candidate_id: &str,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> WorkflowResult<Page<ApplicationWithJob>> {
        let statuses: Vec<ApplicationStatus> = status.into_iter().collect();
        self.list_applications(ApplicationScope::Candidate(candidate_id), &statuses, page)
            .await
    }

    /// Applications still awaiting a decision: Pending or Reviewed
    pub async fn get_pending_applications(
        &self,
        candidate_id: &str,
        page: PageRequest,
    ) -> WorkflowResult<Page<ApplicationWithJob>> {
        self.list_applications(
            ApplicationScope::Candidate(candidate_id),
            &ApplicationStatus::AWAITING_DECISION,
            page,
        )
        .await
    }

    /// Applicants of one job, visible only to the employer who owns it
    pub async fn get_job_applications(
        &self,
        job_id: &str,
        employer_id: &str,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> WorkflowResult<Page<ApplicationWithJob>> {
        let mut conn = self.db.pool().acquire().await?;
        let job = load_job(&mut *conn, job_id).await?;
        drop(conn);

        if job.employer_id != employer_id {
            return Err(WorkflowError::Forbidden);
        }

        let statuses: Vec<ApplicationStatus> = status.into_iter().collect();
        self.list_applications(ApplicationScope::Job(&job.id), &statuses, page)
            .await
    }

    async fn list_applications(
        &self,
        scope: ApplicationScope<'_>,
        statuses: &[ApplicationStatus],
        page: PageRequest,
    ) -> WorkflowResult<Page<ApplicationWithJob>> {
        let mut conn = self.db.pool().acquire().await?;
        let (rows, total) = ApplicationRepository::new(&mut *conn)
            .list(scope, statuses, page)
            .await?;
        Ok(Page::new(rows, page, total))
    }
}
