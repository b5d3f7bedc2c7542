use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::availability, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/teachers/availability",
        get(availability::get_availability)
            .post(availability::replace_availability)
            .patch(availability::update_availability)
            .delete(availability::delete_availability),
    )
}
