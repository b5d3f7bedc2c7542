use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::teachers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/teachers",
            get(teachers::list_teachers)
                .post(teachers::register_teacher)
                .patch(teachers::update_teacher),
        )
        .route("/api/teachers/status", get(teachers::teacher_status))
        .route(
            "/api/teachers/club-counts",
            get(teachers::club_count_report).post(teachers::fix_club_counts),
        )
}
