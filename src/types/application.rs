use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::job::JobStatus;

/// Application lifecycle. Any status may be set from any other; `Hired` and
/// `Rejected` are terminal only in the business sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interviewing,
    Offer,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    /// Statuses a candidate sees as "still waiting for an answer"
    pub const AWAITING_DECISION: [ApplicationStatus; 2] =
        [ApplicationStatus::Pending, ApplicationStatus::Reviewed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Hired => "Hired",
        }
    }

    pub fn is_awaiting_decision(&self) -> bool {
        Self::AWAITING_DECISION.contains(self)
    }

    /// Text of the notification a candidate receives when their application
    /// moves into this status.
    pub fn candidate_message(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Đơn ứng tuyển của bạn đang chờ xử lý",
            ApplicationStatus::Reviewed => "Đơn ứng tuyển của bạn đã được nhà tuyển dụng xem xét",
            ApplicationStatus::Interviewing => "Bạn đã được mời tham gia phỏng vấn",
            ApplicationStatus::Offer => "Bạn đã nhận được lời mời làm việc",
            ApplicationStatus::Rejected => "Rất tiếc, đơn ứng tuyển của bạn đã bị từ chối",
            ApplicationStatus::Hired => "Chúc mừng! Bạn đã được tuyển dụng",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown application status: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub candidate_id: String,
    pub job_id: String,
    pub resume_id: String,
    pub application_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub note: Option<String>,
    pub last_status_update: DateTime<Utc>,
}

/// The parts of a job shown next to an application or favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub employer_id: String,
    #[sqlx(rename = "job_title")]
    pub title: String,
    #[sqlx(rename = "job_location")]
    pub location: Option<String>,
    pub job_type: Option<String>,
    #[sqlx(rename = "job_status")]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    #[sqlx(flatten)]
    pub job: JobSummary,
}
