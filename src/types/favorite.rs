use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::application::JobSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteJob {
    pub id: String,
    pub candidate_id: String,
    pub job_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteJobWithJob {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub favorite: FavoriteJob,
    #[sqlx(flatten)]
    pub job: JobSummary,
}

/// Outcome of toggling a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub is_favorite: bool,
}
