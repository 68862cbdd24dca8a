// src/web/handlers/system_handlers.rs
use crate::app_log;
use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::types::User;
use crate::web::types::{DataResponse, ErrorResponse, TextResponse};
use crate::workflow::ApplicationWorkflow;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

pub async fn get_current_user_handler(auth: AuthenticatedUser) -> Json<DataResponse<User>> {
    Json(DataResponse::success(auth.user().clone()))
}

pub async fn health_handler(
    auth: OptionalAuth,
    workflow: &State<ApplicationWorkflow>,
) -> Result<Json<TextResponse>, (Status, Json<ErrorResponse>)> {
    if let Some(user) = auth.user {
        app_log!(debug, "Health check by authenticated user: {}", user.user().email);
    } else {
        app_log!(debug, "Health check by anonymous user");
    }

    match workflow.database().health_check().await {
        Ok(()) => Ok(Json(TextResponse::success("OK"))),
        Err(e) => {
            app_log!(error, "Health check failed: {}", e);
            Err((
                Status::ServiceUnavailable,
                Json(ErrorResponse::new("Lỗi cơ sở dữ liệu", "SERVER_ERROR")),
            ))
        }
    }
}
