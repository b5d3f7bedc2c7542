//! # Notification Handlers
//!
//! In-app notifications per user. Other handlers create most of them as a
//! side effect; these endpoints list, create, mark read and delete them.
//! Listing is paged and reports the unread count alongside the page.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clubly_core::{
    errors::ClubError,
    models::{
        non_blank,
        notification::{
            CreateNotificationRequest, MarkReadRequest, MarkReadResponse, NewNotification,
            Notification, NotificationFilter, NotificationType, NotificationsResponse,
            DEFAULT_PAGE_SIZE,
        },
        MessageResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub user_id: Option<String>,
    pub read: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteNotificationQuery {
    pub user_id: Option<String>,
    pub notification_id: Option<Uuid>,
}

fn parse_kind(kind: &str) -> Result<NotificationType, ClubError> {
    kind.parse().map_err(ClubError::Validation)
}

/// Lists a user's notifications, newest first, with their unread count.
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let user_id = non_blank(&query.user_id)
        .ok_or_else(|| ClubError::required("user_id"))?
        .to_string();

    let kind = non_blank(&query.kind).map(parse_kind).transpose()?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);
    if limit < 1 || offset < 0 {
        return Err(ClubError::Validation(
            "limit must be positive and offset must not be negative".to_string(),
        )
        .into());
    }

    let notifications = state
        .notifications
        .list(NotificationFilter {
            user_id: user_id.clone(),
            read: query.read,
            kind,
            limit,
            offset,
        })
        .await
        .map_err(ClubError::Database)?;

    let unread_count = state
        .notifications
        .count_unread(user_id)
        .await
        .map_err(ClubError::Database)?;

    let total = notifications.len();
    Ok(Json(NotificationsResponse {
        notifications,
        total,
        unread_count,
    }))
}

#[axum::debug_handler]
pub async fn create_notification(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let (Some(user_id), Some(kind), Some(title), Some(message)) = (
        non_blank(&payload.user_id),
        non_blank(&payload.kind),
        non_blank(&payload.title),
        non_blank(&payload.message),
    ) else {
        return Err(ClubError::required("user_id, type, title, and message").into());
    };

    let notification = state
        .notifications
        .create(NewNotification {
            user_id: user_id.to_string(),
            kind: parse_kind(kind)?,
            title: title.to_string(),
            message: message.to_string(),
            related_id: payload.related_id,
        })
        .await
        .map_err(ClubError::Database)?;

    Ok((StatusCode::CREATED, Json(notification)))
}

/// Marks specific notifications, or all of a user's unread ones, as read.
#[axum::debug_handler]
pub async fn mark_notifications_read(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, AppError> {
    let user_id = non_blank(&payload.user_id)
        .ok_or_else(|| ClubError::required("user_id"))?
        .to_string();

    let ids = if payload.mark_all_read {
        None
    } else {
        match payload.notification_ids {
            Some(ids) if !ids.is_empty() => Some(ids),
            _ => {
                return Err(ClubError::Validation(
                    "Either notification_ids or mark_all_read is required".to_string(),
                )
                .into())
            }
        }
    };

    let updated = state
        .notifications
        .mark_read(user_id, ids)
        .await
        .map_err(ClubError::Database)?;

    Ok(Json(MarkReadResponse {
        message: "Notifications marked as read".to_string(),
        updated,
    }))
}

/// Deletes one notification, or every read notification of the user when
/// no id is given.
#[axum::debug_handler]
pub async fn delete_notifications(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DeleteNotificationQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = non_blank(&query.user_id)
        .ok_or_else(|| ClubError::required("user_id"))?
        .to_string();

    let deleted = state
        .notifications
        .delete(user_id, query.notification_id)
        .await
        .map_err(ClubError::Database)?;

    let message = match query.notification_id {
        Some(_) if deleted == 0 => {
            return Err(ClubError::NotFound("Notification not found".to_string()).into())
        }
        Some(_) => "Notification deleted successfully".to_string(),
        None => format!("Deleted {} read notification(s)", deleted),
    };

    Ok(Json(MessageResponse::new(message)))
}
