// src/web/types.rs - request and response bodies of the HTTP API

use crate::app_log;
use crate::error::WorkflowError;
use crate::types::{ApplicationStatus, Page, Pagination};
use rocket::form::FromForm;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;

// ===== Requests =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
    pub employer_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    #[serde(default)]
    pub candidate_id: String,
    #[serde(default)]
    pub job_id: String,
}

#[derive(FromForm)]
pub struct CandidateListQuery {
    #[field(name = "candidateId")]
    pub candidate_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

#[derive(FromForm)]
pub struct JobApplicationsQuery {
    #[field(name = "employerId")]
    pub employer_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

#[derive(FromForm)]
pub struct NotificationQuery {
    #[field(name = "unreadOnly")]
    pub unread_only: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Parse an optional `status` query value, treating blank as absent
pub fn parse_status_filter(
    status: Option<&str>,
) -> Result<Option<ApplicationStatus>, WorkflowError> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<ApplicationStatus>()
            .map(Some)
            .map_err(|_| WorkflowError::validation(format!("Trạng thái không hợp lệ: {}", raw))),
        None => Ok(None),
    }
}

// ===== Responses =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    pub success: bool,
    pub message: String,
}

impl TextResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PagedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> From<Page<T>> for PagedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            data: page.data,
            pagination: page.pagination,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct FavoriteToggleResponse {
    pub success: bool,
    pub message: String,
    pub is_favorite: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CountData {
    pub count: u64,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UpdatedData {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(code.to_string()),
        }
    }
}

/// Error leaving a handler: status plus JSON body
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn forbidden() -> Self {
        WorkflowError::Forbidden.into()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let status = Status::from_code(err.status_code()).unwrap_or(Status::InternalServerError);
        if status == Status::InternalServerError {
            app_log!(error, "Request failed: {:?}", err);
        }

        Self {
            status,
            body: ErrorResponse::new(err.to_string(), err.code()),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        (self.status, Json(self.body)).respond_to(req)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
