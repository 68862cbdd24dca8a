// src/web/handlers/favorite_handlers.rs
use super::application_handlers::resolve_candidate;
use crate::app_log;
use crate::auth::AuthenticatedUser;
use crate::types::{FavoriteJobWithJob, PageRequest};
use crate::web::types::{
    ApiError, ApiResult, CandidateListQuery, FavoriteToggleResponse, PagedResponse,
    ToggleFavoriteRequest,
};
use crate::workflow::ApplicationWorkflow;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

pub async fn toggle_favorite_handler(
    request: Json<ToggleFavoriteRequest>,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<(Status, Json<FavoriteToggleResponse>)> {
    if !request.candidate_id.trim().is_empty() && !auth.can_act_for(&request.candidate_id) {
        app_log!(
            warn,
            "User {} tried to toggle favorites of {}",
            auth.id(),
            request.candidate_id
        );
        return Err(ApiError::forbidden());
    }

    let toggle = workflow
        .toggle_favorite_job(&request.candidate_id, &request.job_id)
        .await?;

    let (status, message) = if toggle.is_favorite {
        (Status::Created, "Đã thêm vào danh sách yêu thích")
    } else {
        (Status::Ok, "Đã xóa khỏi danh sách yêu thích")
    };

    Ok((
        status,
        Json(FavoriteToggleResponse {
            success: true,
            message: message.to_string(),
            is_favorite: toggle.is_favorite,
        }),
    ))
}

pub async fn favorite_jobs_handler(
    query: CandidateListQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<FavoriteJobWithJob>>> {
    let candidate_id = resolve_candidate(&auth, query.candidate_id)?;
    let page = PageRequest::new(query.page, query.limit);

    let favorites = workflow.get_favorite_jobs(&candidate_id, page).await?;
    Ok(Json(favorites.into()))
}
