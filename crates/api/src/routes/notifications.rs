use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::notifications, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/notifications",
        get(notifications::list_notifications)
            .post(notifications::create_notification)
            .patch(notifications::mark_notifications_read)
            .delete(notifications::delete_notifications),
    )
}
