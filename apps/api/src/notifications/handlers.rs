//! Axum route handlers for the notification log. Every route is scoped to
//! the `x-user-id` caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::{ensure_caller, CallerId};
use crate::models::notification::{NewNotification, NotificationRow};
use crate::state::AppState;
use crate::store::Store;

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationRow>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub notification: NotificationRow,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub read: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

/// The notification with `raw_id` if it belongs to `user_id`. Malformed ids
/// are treated like unknown ones.
async fn owned_notification(
    store: &dyn Store,
    user_id: &str,
    raw_id: &str,
) -> Result<NotificationRow, AppError> {
    let not_found = || AppError::NotFound("Notification not found".to_string());
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    store
        .get_notification(id)
        .await?
        .filter(|n| n.user_id == user_id)
        .ok_or_else(not_found)
}

/// GET /api/notifications
///
/// Newest first.
pub async fn handle_list(
    State(state): State<AppState>,
    caller: CallerId,
) -> Result<Json<NotificationListResponse>, AppError> {
    let user = ensure_caller(state.store.as_ref(), &caller).await?;
    let notifications = state.store.list_notifications(&user.id).await?;
    Ok(Json(NotificationListResponse { notifications }))
}

/// POST /api/notifications
pub async fn handle_create(
    State(state): State<AppState>,
    caller: CallerId,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), AppError> {
    let (Some(kind), Some(title), Some(message)) = (
        request.kind.as_deref().filter(|v| !v.trim().is_empty()),
        request.title.as_deref().filter(|v| !v.trim().is_empty()),
        request.message.as_deref().filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: type, title, message".to_string(),
        ));
    };

    let user = ensure_caller(state.store.as_ref(), &caller).await?;
    let notification = state
        .store
        .insert_notification(
            &user.id,
            &NewNotification {
                kind: kind.to_string(),
                title: title.to_string(),
                message: message.to_string(),
                metadata: request.metadata.filter(|m| !m.is_null()),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse { notification }),
    ))
}

/// PUT /api/notifications/:id
///
/// Sets the read flag; a missing body or `read` field means read.
pub async fn handle_mark_read(
    State(state): State<AppState>,
    caller: CallerId,
    Path(id): Path<String>,
    body: Option<Json<MarkReadRequest>>,
) -> Result<Json<NotificationResponse>, AppError> {
    let store = state.store.as_ref();
    let user = ensure_caller(store, &caller).await?;
    let existing = owned_notification(store, &user.id, &id).await?;

    let read = body.and_then(|Json(b)| b.read).unwrap_or(true);
    let notification = store
        .set_notification_read(existing.id, read)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    Ok(Json(NotificationResponse { notification }))
}

/// DELETE /api/notifications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    caller: CallerId,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let store = state.store.as_ref();
    let user = ensure_caller(store, &caller).await?;
    let existing = owned_notification(store, &user.id, &id).await?;
    store.delete_notification(existing.id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/notifications/read-all
pub async fn handle_read_all(
    State(state): State<AppState>,
    caller: CallerId,
) -> Result<Json<ReadAllResponse>, AppError> {
    let user = ensure_caller(state.store.as_ref(), &caller).await?;
    let updated = state.store.mark_all_notifications_read(&user.id).await?;
    Ok(Json(ReadAllResponse { updated }))
}

