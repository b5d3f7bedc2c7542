use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/clubs", post(handlers::clubs::create_club))
        .route("/api/clubs/:id", get(handlers::clubs::get_club))
}
