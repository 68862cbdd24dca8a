use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationType {
    System,
    JobMatch,
    ApplicationStatus,
    NewMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: &str,
        kind: NotificationType,
        message: impl Into<String>,
        link: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            message: message.into(),
            read: false,
            link,
            created_at: Utc::now(),
        }
    }
}
