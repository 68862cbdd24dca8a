// src/workflow/mod.rs
//! Application lifecycle: submission, status transitions, favorites,
//! candidate/employer listings and the notifications they produce.
//!
//! Every operation that writes more than one row (an application plus its
//! notifications) runs inside a single transaction.

mod favorites;
pub mod notifications;
mod retrieval;
mod status;
mod submission;

pub use submission::SubmitApplication;

use crate::core::Database;
use crate::error::{WorkflowError, WorkflowResult};
use crate::repositories::JobRepository;
use crate::types::Job;
use sqlx::SqliteConnection;

/// Behaviour switches for the workflow
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowSettings {
    /// Reject submissions once the job's application deadline has passed
    pub enforce_application_deadline: bool,
}

#[derive(Debug, Clone)]
pub struct ApplicationWorkflow {
    db: Database,
    settings: WorkflowSettings,
}

impl ApplicationWorkflow {
    pub fn new(db: Database, settings: WorkflowSettings) -> Self {
        Self { db, settings }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn settings(&self) -> WorkflowSettings {
        self.settings
    }
}

/// Trimmed value of a required identifier, or a validation error naming it
fn require_field<'a>(value: &'a str, field: &str) -> WorkflowResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::validation(format!(
            "Thiếu thông tin bắt buộc: {}",
            field
        )));
    }
    Ok(trimmed)
}

async fn load_job(conn: &mut SqliteConnection, job_id: &str) -> WorkflowResult<Job> {
    JobRepository::new(conn)
        .find_by_id(job_id)
        .await?
        .ok_or_else(|| WorkflowError::not_found("Không tìm thấy công việc"))
}
