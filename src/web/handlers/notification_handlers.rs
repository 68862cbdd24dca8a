// src/web/handlers/notification_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::types::{Notification, PageRequest};
use crate::web::types::{
    ApiResult, CountData, DataResponse, NotificationQuery, PagedResponse, TextResponse,
    UpdatedData,
};
use crate::workflow::ApplicationWorkflow;

use rocket::serde::json::Json;
use rocket::State;

// Notifications are always the caller's own inbox

pub async fn list_notifications_handler(
    query: NotificationQuery,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<PagedResponse<Notification>>> {
    let page = PageRequest::new(query.page, query.limit);
    let inbox = workflow
        .list_notifications(auth.id(), query.unread_only.unwrap_or(false), page)
        .await?;
    Ok(Json(inbox.into()))
}

pub async fn unread_count_handler(
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<CountData>>> {
    let count = workflow.unread_notification_count(auth.id()).await?;
    Ok(Json(DataResponse::success(CountData { count })))
}

pub async fn mark_read_handler(
    notification_id: &str,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<Notification>>> {
    let notification = workflow
        .mark_notification_read(notification_id, auth.id())
        .await?;
    Ok(Json(DataResponse::success(notification)))
}

pub async fn mark_all_read_handler(
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<DataResponse<UpdatedData>>> {
    let updated = workflow.mark_all_notifications_read(auth.id()).await?;
    Ok(Json(
        DataResponse::success(UpdatedData { updated })
            .with_message("Đã đánh dấu tất cả thông báo là đã đọc"),
    ))
}

pub async fn delete_notification_handler(
    notification_id: &str,
    auth: AuthenticatedUser,
    workflow: &State<ApplicationWorkflow>,
) -> ApiResult<Json<TextResponse>> {
    workflow
        .delete_notification(notification_id, auth.id())
        .await?;
    Ok(Json(TextResponse::success("Đã xóa thông báo")))
}
