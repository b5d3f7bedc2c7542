use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::tasks, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/tasks",
        get(tasks::list_tasks)
            .post(tasks::create_task)
            .put(tasks::update_task)
            .delete(tasks::delete_task),
    )
}
