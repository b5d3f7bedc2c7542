//! # Task Handlers
//!
//! A per-club task list. Every operation is scoped by `club_id`, so a task
//! id from another club behaves as if it did not exist.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clubly_core::{
    errors::ClubError,
    models::{
        task::{CreateTaskRequest, Task, TasksResponse, UpdateTaskRequest},
        MessageResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub club_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
}

fn task_not_found(id: Uuid) -> ClubError {
    ClubError::NotFound(format!("Task with ID {} not found", id))
}

#[axum::debug_handler]
pub async fn list_tasks(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<TasksResponse>, AppError> {
    let club_id = query.club_id.ok_or_else(|| ClubError::required("club_id"))?;

    let tasks = state
        .tasks
        .list(club_id)
        .await
        .map_err(ClubError::Database)?;

    let total = tasks.len();
    Ok(Json(TasksResponse { tasks, total }))
}

#[axum::debug_handler]
pub async fn create_task(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let (Some(club_id), Some(input)) = (payload.club_id, payload.task) else {
        return Err(ClubError::required("club_id and task").into());
    };
    let new_task = input.into_new_task(club_id)?;

    state
        .clubs
        .get_by_id(club_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound(format!("Club with ID {} not found", club_id)))?;

    let task = state
        .tasks
        .create(new_task)
        .await
        .map_err(ClubError::Database)?;

    info!("Task {} created for club {}", task.id, club_id);
    Ok((StatusCode::CREATED, Json(task)))
}

#[axum::debug_handler]
pub async fn update_task(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let (Some(club_id), Some(task_id), Some(input)) =
        (payload.club_id, payload.task_id, payload.task)
    else {
        return Err(ClubError::required("club_id, task_id, and task").into());
    };
    let changes = input.into_changes()?;

    let task = state
        .tasks
        .update(club_id, task_id, changes)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| task_not_found(task_id))?;

    Ok(Json(task))
}

#[axum::debug_handler]
pub async fn delete_task(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(club_id), Some(task_id)) = (query.club_id, query.task_id) else {
        return Err(ClubError::required("club_id and task_id").into());
    };

    let deleted = state
        .tasks
        .delete(club_id, task_id)
        .await
        .map_err(ClubError::Database)?;
    if !deleted {
        return Err(task_not_found(task_id).into());
    }

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
