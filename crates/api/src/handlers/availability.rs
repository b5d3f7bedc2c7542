//! # Availability Handlers
//!
//! Teachers publish weekly office-hours slots. A `POST` replaces the whole
//! set for a teacher; `PATCH` and `DELETE` work on single slots.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clubly_core::{
    errors::ClubError,
    models::{
        availability::{
            validate_slot, AvailabilityResponse, ReplaceAvailabilityRequest,
            ReplaceAvailabilityResponse, TeacherAvailability, UpdateAvailabilityRequest,
        },
        MessageResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAvailabilityQuery {
    pub availability_id: Option<Uuid>,
}

/// Returns a teacher's active slots ordered by day, then start time.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let teacher_id = query
        .teacher_id
        .ok_or_else(|| ClubError::required("teacher_id"))?;

    let availability = state
        .availability
        .list_active(teacher_id)
        .await
        .map_err(ClubError::Database)?;

    Ok(Json(AvailabilityResponse { availability }))
}

/// Replaces every slot of a teacher with the submitted list.
///
/// All slots are validated before anything is written. An empty list clears
/// the teacher's availability.
#[axum::debug_handler]
pub async fn replace_availability(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ReplaceAvailabilityRequest>,
) -> Result<(StatusCode, Json<ReplaceAvailabilityResponse>), AppError> {
    let (Some(teacher_id), Some(slots)) = (payload.teacher_id, payload.availability) else {
        return Err(ClubError::required("teacher_id and availability array").into());
    };

    state
        .teachers
        .get_by_id(teacher_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Teacher not found".to_string()))?;

    for slot in &slots {
        slot.validate()?;
    }

    let availability = state
        .availability
        .replace(teacher_id, slots)
        .await
        .map_err(ClubError::Database)?;

    info!(
        "Teacher {} now has {} availability slot(s)",
        teacher_id,
        availability.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(ReplaceAvailabilityResponse {
            availability,
            message: "Availability updated successfully".to_string(),
        }),
    ))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<TeacherAvailability>, AppError> {
    let availability_id = payload
        .availability_id
        .ok_or_else(|| ClubError::required("availability_id"))?;

    let current = state
        .availability
        .get_by_id(availability_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(slot_not_found)?;

    // Validate the slot as it will look after the change
    let merged = payload.merge_into(&current);
    validate_slot(merged.day_of_week, merged.start_time, merged.end_time)?;

    let updated = state
        .availability
        .update(merged)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(slot_not_found)?;

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DeleteAvailabilityQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let availability_id = query
        .availability_id
        .ok_or_else(|| ClubError::required("availability_id"))?;

    let deleted = state
        .availability
        .delete(availability_id)
        .await
        .map_err(ClubError::Database)?;
    if !deleted {
        return Err(slot_not_found().into());
    }

    Ok(Json(MessageResponse::new("Availability slot deleted successfully")))
}

fn slot_not_found() -> ClubError {
    ClubError::NotFound("Availability slot not found".to_string())
}
