use crate::{
    application::ApplicationState,
    dto::{input, output},
    error::Error,
    service::notifications_service::NotificationsService,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub fn routing() -> Router<ApplicationState> {
    Router::new()
        .route("/api/v1/notifications", post(post_notification))
        .route(
            "/api/v1/notifications/:notification_id",
            get(get_notification).delete(delete_notification),
        )
        .route("/health", get(get_health))
}

///
/// Schedule a new notification
///
/// ### Returns
/// 201 on success
///
/// ### Errors
/// - 400 when channel is unknown, subject is empty or recipient
/// does not parse for the channel
/// - 409 when notification with the same id already exists
///
async fn post_notification(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Json(notification): Json<input::Notification>,
) -> Result<(StatusCode, Json<output::Notification>), Error> {
    let notification = notifications_service
        .create_notification(
            notification.recipient,
            notification.channel,
            notification.subject,
            notification.message,
            notification.scheduled_at,
            notification.author_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(notification.into())))
}

///
/// Find notification
///
/// ### Returns
/// 200 on success
///
/// ### Errors
/// - 400 when id is not a valid UUID
/// - 404 when notification does not exist
///
async fn get_notification(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(notification_id): Path<Uuid>,
) -> Result<(StatusCode, Json<output::Notification>), Error> {
    let notification = notifications_service
        .get_notification(notification_id)
        .await?;

    Ok((StatusCode::OK, Json(notification.into())))
}

///
/// Cancel scheduled notification
///
/// ### Returns
/// 204 on success
///
/// ### Errors
/// - 400 when id is not a valid UUID
/// - 404 when notification does not exist
/// - 409 when notification is no longer scheduled
///
async fn delete_notification(
    State(notifications_service): State<Arc<dyn NotificationsService>>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    notifications_service
        .cancel_notification(notification_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
