// src/web/handlers/application_handlers.rs
use crate::app_log;
use crate::auth::AuthenticatedUser;
use crate::error::WorkflowError;
use crate::types::{Application, ApplicationStatus, ApplicationWithJob, PageRequest, Role};
use crate::web::types::{
    parse_status_filter, ApiError, ApiResult, CandidateListQuery, DataResponse,
    JobApplicationsQuery, PagedResponse, UpdateStatusRequest,
};
use crate::workflow::{ApplicationWorkflow, SubmitApplication};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

/// Resolve the candidate a list request is about, defaulting to the caller
pub(crate) fn resolve_candidate(
    auth: &AuthenticatedUser,
    candidate_id: Option<String>,
) -> ApiResult<String> {
    let candidate_id = candidate_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| auth.id().to_string());

    if !auth.can_act_for(&candidate_id) {
        app_log!(
            warn,
            "User {} tried to read data of candidate {}",
            auth.id(),
            candidate_id
        );
        return Err(ApiError::forbidden());
    }
    Ok(candidate_id)
}

pub async fn submit_application_handler(
    request: Json<SubmitApplication>,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<(Status, Json<DataResponse<Application>>)> {
    let request = request.into_inner();

    let user = auth.user();
    if user.role != Role::Candidate && !user.is_admin() {
        app_log!(
            warn,
            "User {} with role {} tried to submit an application",
            user.id,
            user.role
        );
        return Err(ApiError::forbidden());
    }

    // Blank ids fall through to the workflow's validation
    if !request.candidate_id.trim().is_empty() && !auth.can_act_for(&request.candidate_id) {
        app_log!(
            warn,
            "User {} tried to apply on behalf of {}",
            auth.id(),
            request.candidate_id
        );
        return Err(ApiError::forbidden());
    }

    let application = workflow.submit_application(request).await?;

    Ok((
        Status::Created,
        Json(DataResponse::success(application).with_message("Ứng tuyển thành công")),
    ))
}

pub async fn application_history_handler(
    query: CandidateListQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<ApplicationWithJob>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let candidate_id = resolve_candidate(&auth, query.candidate_id)?;
    let page = PageRequest::new(query.page, query.limit);

    let history = workflow
        .get_application_history(&candidate_id, status, page)
        .await?;
    Ok(Json(history.into()))
}

pub async fn pending_applications_handler(
    query: CandidateListQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<ApplicationWithJob>>> {
    let candidate_id = resolve_candidate(&auth, query.candidate_id)?;
    let page = PageRequest::new(query.page, query.limit);

    let pending = workflow.get_pending_applications(&candidate_id, page).await?;
    Ok(Json(pending.into()))
}

pub async fn update_status_handler(
    application_id: &str,
    request: Json<UpdateStatusRequest>,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<Application>>> {
    let request = request.into_inner();

    let status: ApplicationStatus = request.status.trim().parse().map_err(|_| {
        WorkflowError::validation(format!("Trạng thái không hợp lệ: {}", request.status))
    })?;

    let employer_id = request
        .employer_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| auth.id().to_string());
    if !auth.can_act_for(&employer_id) {
        return Err(ApiError::forbidden());
    }

    let application = workflow
        .update_application_status(application_id, &employer_id, status, request.note)
        .await?;

    Ok(Json(
        DataResponse::success(application).with_message("Cập nhật trạng thái thành công"),
    ))
}

pub async fn job_applications_handler(
    job_id: &str,
    query: JobApplicationsQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<ApplicationWithJob>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let employer_id = query
        .employer_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| auth.id().to_string());
    if !auth.can_act_for(&employer_id) {
        return Err(ApiError::forbidden());
    }
    let page = PageRequest::new(query.page, query.limit);

    let applicants = workflow
        .get_job_applications(job_id, &employer_id, status, page)
        .await?;
    Ok(Json(applicants.into()))
}
