// src/error.rs
use thiserror::Error;

/// Failures of the application workflow. Every variant carries the
/// user-facing (Vietnamese) message through `Display`.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("Bạn đã ứng tuyển công việc này rồi")]
    DuplicateApplication,

    #[error("Công việc này không còn nhận hồ sơ ứng tuyển")]
    JobUnavailable,

    #[error("{0}")]
    NotFound(String),

    #[error("Bạn không có quyền thực hiện thao tác này")]
    Forbidden,

    #[error("Lỗi cơ sở dữ liệu: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Lỗi máy chủ: {0}")]
    Internal(#[from] anyhow::Error),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WorkflowError::NotFound(message.into())
    }

    /// Machine-readable code sent next to the message
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "VALIDATION_ERROR",
            WorkflowError::DuplicateApplication => "DUPLICATE_APPLICATION",
            WorkflowError::JobUnavailable => "JOB_UNAVAILABLE",
            WorkflowError::NotFound(_) => "NOT_FOUND",
            WorkflowError::Forbidden => "FORBIDDEN",
            WorkflowError::Database(_) | WorkflowError::Internal(_) => "SERVER_ERROR",
        }
    }

    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            WorkflowError::Validation(_)
            | WorkflowError::DuplicateApplication
            | WorkflowError::JobUnavailable => 400,
            WorkflowError::Forbidden => 403,
            WorkflowError::NotFound(_) => 404,
            WorkflowError::Database(_) | WorkflowError::Internal(_) => 500,
        }
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
