// src/web/mod.rs - Rocket routes, catchers and server bootstrap

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::app_log;
use crate::auth::{AuthConfig, AuthFailure, AuthenticatedUser, OptionalAuth};
use crate::core::{AppConfig, Database};
use crate::types::{Application, ApplicationWithJob, FavoriteJobWithJob, Notification, User};
use crate::workflow::{ApplicationWorkflow, SubmitApplication, WorkflowSettings};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, put, routes, Build, Request, Response, Rocket, State};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Applications

#[post("/applications/submit", data = "<request>")]
pub async fn submit_application(
    request: Json<SubmitApplication>,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<(Status, Json<DataResponse<Application>>)> {
    handlers::submit_application_handler(request, auth, workflow).await
}

#[get("/applications/history?<query..>")]
pub async fn application_history(
    query: CandidateListQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<ApplicationWithJob>>> {
    handlers::application_history_handler(query, auth, workflow).await
}

#[get("/applications/pending?<query..>")]
pub async fn pending_applications(
    query: CandidateListQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<ApplicationWithJob>>> {
    handlers::pending_applications_handler(query, auth, workflow).await
}

#[put("/applications/status/<application_id>", data = "<request>")]
pub async fn update_application_status(
    application_id: &str,
    request: Json<UpdateStatusRequest>,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<Application>>> {
    handlers::update_status_handler(application_id, request, auth, workflow).await
}

#[get("/applications/job/<job_id>?<query..>")]
pub async fn job_applications(
    job_id: &str,
    query: JobApplicationsQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<ApplicationWithJob>>> {
    handlers::job_applications_handler(job_id, query, auth, workflow).await
}

// Favorites

#[post("/applications/favorites/toggle", data = "<request>")]
pub async fn toggle_favorite(
    request: Json<ToggleFavoriteRequest>,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<(Status, Json<FavoriteToggleResponse>)> {
    handlers::toggle_favorite_handler(request, auth, workflow).await
}

#[get("/applications/favorites?<query..>")]
pub async fn favorite_jobs(
    query: CandidateListQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<FavoriteJobWithJob>>> {
    handlers::favorite_jobs_handler(query, auth, workflow).await
}

// Notifications

#[get("/notifications?<query..>")]
pub async fn list_notifications(
    query: NotificationQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<Notification>>> {
    handlers::list_notifications_handler(query, auth, workflow).await
}

#[get("/notifications/unread-count")]
pub async fn unread_notification_count(
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<CountData>>> {
    handlers::unread_count_handler(auth, workflow).await
}

#[put("/notifications/read-all")]
pub async fn mark_all_notifications_read(
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<UpdatedData>>> {
    handlers::mark_all_read_handler(auth, workflow).await
}

#[put("/notifications/<notification_id>/read")]
pub async fn mark_notification_read(
    notification_id: &str,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<Notification>>> {
    handlers::mark_read_handler(notification_id, auth, workflow).await
}

#[delete("/notifications/<notification_id>")]
pub async fn delete_notification(
    notification_id: &str,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<TextResponse>> {
    handlers::delete_notification_handler(notification_id, auth, workflow).await
}

// System

#[get("/me")]
pub async fn get_current_user(auth: AuthenticatedUser) -> Json<DataResponse<User>> {
    handlers::get_current_user_handler(auth).await
}

#[get("/health")]
pub async fn health(
    auth: OptionalAuth,
    workflow: &State<ApplicationWorkflow>,
) -> Result<Json<TextResponse>, (Status, Json<ErrorResponse>)> {
    handlers::health_handler(auth, workflow).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Định dạng yêu cầu không hợp lệ",
        "VALIDATION_ERROR",
    ))
}

#[rocket::catch(401)]
pub fn unauthorized(req: &Request<'_>) -> Json<ErrorResponse> {
    let failure = req.local_cache(AuthFailure::default);
    Json(ErrorResponse::new(
        failure.0.unwrap_or("Yêu cầu mã xác thực"),
        "UNAUTHORIZED",
    ))
}

#[rocket::catch(403)]
pub fn forbidden() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Bạn không có quyền thực hiện thao tác này",
        "FORBIDDEN",
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Không tìm thấy tài nguyên", "NOT_FOUND"))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Dữ liệu yêu cầu không hợp lệ",
        "VALIDATION_ERROR",
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Lỗi máy chủ", "SERVER_ERROR"))
}

/// Assemble the API around an already connected workflow
pub fn build_rocket(workflow: ApplicationWorkflow, auth_config: AuthConfig) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(workflow)
        .manage(auth_config)
        .register(
            "/api",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                submit_application,
                application_history,
                pending_applications,
                update_application_status,
                job_applications,
                toggle_favorite,
                favorite_jobs,
                list_notifications,
                unread_notification_count,
                mark_all_notifications_read,
                mark_notification_read,
                delete_notification,
                get_current_user,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let jwt_secret = config.require_jwt_secret()?;

    let database = match Database::connect(&config.database_url).await {
        Ok(database) => database,
        Err(e) => {
            app_log!(error, "Failed to initialize database: {}", e);
            return Err(e);
        }
    };

    let settings = WorkflowSettings {
        enforce_application_deadline: config.enforce_application_deadline,
    };
    let workflow = ApplicationWorkflow::new(database, settings);
    let auth_config = AuthConfig::new(jwt_secret, config.token_ttl_hours);

    app_log!(info, "Starting job application API server");
    app_log!(info, "Environment: {}", config.environment);
    app_log!(info, "Database: {}", config.database_url);
    if settings.enforce_application_deadline {
        app_log!(info, "Application deadlines are enforced");
    }

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    build_rocket(workflow, auth_config)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}
