use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum JobStatus {
    Active,
    Closed,
    Draft,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Closed => "Closed",
            JobStatus::Draft => "Draft",
            JobStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(JobStatus::Active),
            "closed" => Ok(JobStatus::Closed),
            "draft" => Ok(JobStatus::Draft),
            "archived" => Ok(JobStatus::Archived),
            other => anyhow::bail!("Unknown job status: {}", other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalaryRange {
    #[sqlx(rename = "salary_min")]
    pub min: Option<i64>,
    #[sqlx(rename = "salary_max")]
    pub max: Option<i64>,
    #[sqlx(rename = "salary_currency")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub employer_id: String,
    pub title: String,
    pub description: String,
    #[sqlx(flatten)]
    pub salary: SalaryRange,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub category_id: Option<String>,
    pub status: JobStatus,
    pub application_deadline: Option<DateTime<Utc>>,
    pub views_count: i64,
    pub applicants_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn accepts_applications(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.application_deadline
            .map(|deadline| deadline < now)
            .unwrap_or(false)
    }
}
