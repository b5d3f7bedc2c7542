//! Request handlers, one module per resource.

pub mod advisor_requests;
pub mod availability;
pub mod clubs;
pub mod meeting_bookings;
pub mod notifications;
pub mod tasks;
pub mod teachers;

use clubly_core::models::notification::NewNotification;
use tracing::warn;

use crate::ApiState;

/// Inserts a notification without letting a failure reach the caller.
///
/// Notifications are a side effect of the request that triggered them, so
/// errors are logged and dropped.
pub(crate) async fn notify(state: &ApiState, notification: NewNotification) {
    let user_id = notification.user_id.clone();
    let kind = notification.kind;

    if let Err(err) = state.notifications.create(notification).await {
        warn!(
            "Failed to deliver {} notification to {}: {:?}",
            kind, user_id, err
        );
    }
}
