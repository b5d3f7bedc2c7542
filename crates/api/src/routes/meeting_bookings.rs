use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::meeting_bookings, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/meeting-bookings",
            get(meeting_bookings::list_bookings)
                .post(meeting_bookings::create_booking)
                .patch(meeting_bookings::update_booking_status),
        )
        .route(
            "/api/meeting-bookings/check-conflict",
            get(meeting_bookings::check_conflict),
        )
}
