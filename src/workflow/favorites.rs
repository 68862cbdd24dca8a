// src/workflow/favorites.rs
use super::{load_job, require_field, ApplicationWorkflow};
use crate::app_log;
use crate::error::{is_unique_violation, WorkflowResult};
use crate::repositories::FavoriteRepository;
use crate::types::{FavoriteJob, FavoriteToggle};
use chrono::Utc;

impl ApplicationWorkflow {
    /// Save or unsave a job for a candidate. No job status check: closed and
    /// archived jobs can be favorited too.
    pub async fn toggle_favorite_job(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> WorkflowResult<FavoriteToggle> {
        let candidate_id = require_field(candidate_id, "candidateId")?;
        let job_id = require_field(job_id, "jobId")?;

        let mut conn = self.db.pool().acquire().await?;
        load_job(&mut *conn, job_id).await?;

        let mut favorites = FavoriteRepository::new(&mut *conn);

        if let Some(existing) = favorites.find(candidate_id, job_id).await? {
            favorites.delete(&existing.id).await?;
            app_log!(info, "Candidate {} unfavorited job {}", candidate_id, job_id);
            return Ok(FavoriteToggle { is_favorite: false });
        }

        let favorite = FavoriteJob {
            id: uuid::Uuid::new_v4().to_string(),
            candidate_id: candidate_id.to_string(),
            job_id: job_id.to_string(),
            created_at: Utc::now(),
        };

        match favorites.insert(&favorite).await {
            Ok(()) => {
                app_log!(info, "Candidate {} favorited job {}", candidate_id, job_id);
            }
            // A concurrent toggle inserted the same pair first
            Err(e) if is_unique_violation(&e) => {
                app_log!(
                    warn,
                    "Concurrent favorite of job {} by candidate {}",
                    job_id,
                    candidate_id
                );
            }
            Err(e) => return Err(e.into()),
        }

        Ok(FavoriteToggle { is_favorite: true })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::error::WorkflowError;
    use crate::types::{JobStatus, PageRequest};

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let fx = Fixture::new().await;

        let first = fx
            .workflow
            .toggle_favorite_job(&fx.candidate.id, &fx.job.id)
            .await
            .unwrap();
        assert!(first.is_favorite);
        assert_eq!(fx.count("favorite_jobs").await, 1);

        let second = fx
            .workflow
            .toggle_favorite_job(&fx.candidate.id, &fx.job.id)
            .await
            .unwrap();
        assert!(!second.is_favorite);
        assert_eq!(fx.count("favorite_jobs").await, 0);
    }

    #[tokio::test]
    async fn test_archived_job_can_be_favorited() {
        let fx = Fixture::new().await;
        let archived = fx.create_job(JobStatus::Archived).await;

        let toggle = fx
            .workflow
            .toggle_favorite_job(&fx.candidate.id, &archived.id)
            .await
            .unwrap();
        assert!(toggle.is_favorite);

        let page = fx
            .workflow
            .get_favorite_jobs(&fx.candidate.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].job.status, JobStatus::Archived);
    }

    #[tokio::test]
    async fn test_favorite_independent_of_application() {
        let fx = Fixture::new().await;
        fx.workflow
            .toggle_favorite_job(&fx.candidate.id, &fx.job.id)
            .await
            .unwrap();
        fx.workflow
            .submit_application(fx.submission(&fx.job.id))
            .await
            .unwrap();

        assert_eq!(fx.count("favorite_jobs").await, 1);
        assert_eq!(fx.count("applications").await, 1);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx
            .workflow
            .toggle_favorite_job(&fx.candidate.id, "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_second_insert_of_a_pair_is_a_unique_violation() {
        let fx = Fixture::new().await;
        let favorite = FavoriteJob {
            id: "fav-1".to_string(),
            candidate_id: fx.candidate.id.clone(),
            job_id: fx.job.id.clone(),
            created_at: Utc::now(),
        };
        let mut conn = fx.workflow.database().pool().acquire().await.unwrap();
        let mut favorites = FavoriteRepository::new(&mut *conn);
        favorites.insert(&favorite).await.unwrap();

        let again = FavoriteJob {
            id: "fav-2".to_string(),
            ..favorite
        };
        let err = favorites.insert(&again).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_never_fail_or_duplicate() {
        let fx = Fixture::on_disk().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let workflow = fx.workflow.clone();
                let candidate_id = fx.candidate.id.clone();
                let job_id = fx.job.id.clone();
                tokio::spawn(async move { workflow.toggle_favorite_job(&candidate_id, &job_id).await })
            })
            .collect();

        let mut reported_favorite = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_favorite {
                reported_favorite += 1;
            }
        }

        let rows = fx.count("favorite_jobs").await;
        assert!(rows <= 1);
        // Every "added" answer saw either its own row or the one that won the race
        assert!(reported_favorite >= 1);
    }
}
