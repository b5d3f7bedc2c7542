use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::advisor_requests, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/advisor-requests",
            get(advisor_requests::list_advisor_requests)
                .post(advisor_requests::create_advisor_request)
                .patch(advisor_requests::update_advisor_request_status),
        )
        .route(
            "/api/advisor-requests/close",
            post(advisor_requests::close_advisor_request),
        )
}
