//! # Advisor Request Handlers
//!
//! Students ask teachers to advise their clubs; teachers approve or deny;
//! students close approved requests when the relationship ends. Every state
//! change follows the lifecycle on [`AdvisorRequestStatus`] and notifies the
//! other party.
//!
//! Approval and closing keep the teacher's `current_clubs_count` in step with
//! the number of approved requests.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clubly_core::{
    errors::ClubError,
    models::{
        advisor_request::{
            AdvisorRequest, AdvisorRequestFilter, AdvisorRequestStatus, AdvisorRequestsResponse,
            CloseAdvisorRequest, CreateAdvisorRequest, NewAdvisorRequest,
            UpdateAdvisorRequestStatus,
        },
        availability::MAX_DAY_OF_WEEK,
        non_blank,
        notification::NewNotification,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::notify;
use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for listing advisor requests. Every one is optional.
#[derive(Debug, Default, Deserialize)]
pub struct AdvisorRequestQuery {
    pub teacher_id: Option<Uuid>,
    pub club_id: Option<Uuid>,
    pub student_id: Option<String>,
    pub status: Option<String>,
}

impl AdvisorRequestQuery {
    fn into_filter(self) -> Result<AdvisorRequestFilter, ClubError> {
        let status = match non_blank(&self.status) {
            Some(status) => Some(
                status
                    .parse::<AdvisorRequestStatus>()
                    .map_err(ClubError::Validation)?,
            ),
            None => None,
        };

        Ok(AdvisorRequestFilter {
            teacher_id: self.teacher_id,
            club_id: self.club_id,
            student_id: non_blank(&self.student_id).map(str::to_string),
            status,
        })
    }
}

/// Lists advisor requests, newest first.
///
/// # Endpoint
///
/// ```text
/// GET /api/advisor-requests?teacher_id=&club_id=&student_id=&status=
/// ```
#[axum::debug_handler]
pub async fn list_advisor_requests(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AdvisorRequestQuery>,
) -> Result<Json<AdvisorRequestsResponse>, AppError> {
    let filter = query.into_filter()?;

    let requests = state
        .advisor_requests
        .list(filter)
        .await
        .map_err(ClubError::Database)?;

    let total = requests.len();
    Ok(Json(AdvisorRequestsResponse { requests, total }))
}

/// Creates a pending advisor request and notifies the teacher.
///
/// Checks run in a fixed order so clients see the most specific reason:
///
/// 1. A live request for the same club, teacher and student → 409
/// 2. Teacher missing → 404, inactive → 400
/// 3. Teacher at capacity → 400
/// 4. Club missing → 404
///
/// A concurrent duplicate that slips past step 1 is caught by the database
/// and also reported as 409.
#[axum::debug_handler]
pub async fn create_advisor_request(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAdvisorRequest>,
) -> Result<(StatusCode, Json<AdvisorRequest>), AppError> {
    let (Some(club_id), Some(teacher_id), Some(student_id)) = (
        payload.club_id,
        payload.teacher_id,
        non_blank(&payload.student_id),
    ) else {
        return Err(ClubError::required("club_id, teacher_id, and student_id").into());
    };
    let student_id = student_id.to_string();

    if let Some(day) = payload.proposed_day {
        if !(0..=MAX_DAY_OF_WEEK).contains(&day) {
            return Err(ClubError::Validation(format!(
                "proposed_day must be between 0 and {}",
                MAX_DAY_OF_WEEK
            ))
            .into());
        }
    }

    let existing = state
        .advisor_requests
        .find_live(club_id, teacher_id, student_id.clone())
        .await
        .map_err(ClubError::Database)?;
    if existing.is_some() {
        return Err(duplicate_request().into());
    }

    let teacher = state
        .teachers
        .get_by_id(teacher_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Teacher not found".to_string()))?;

    if !teacher.active {
        return Err(ClubError::Validation(
            "Teacher is not currently accepting advisor requests".to_string(),
        )
        .into());
    }
    if !teacher.has_capacity() {
        return Err(teacher_full().into());
    }

    let club = state
        .clubs
        .get_by_id(club_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Club not found".to_string()))?;

    let request = state
        .advisor_requests
        .create(NewAdvisorRequest {
            club_id,
            teacher_id,
            student_id,
            message: non_blank(&payload.message).map(str::to_string),
            proposed_day: payload.proposed_day,
            proposed_time: payload.proposed_time,
        })
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(duplicate_request)?;

    info!(
        "Advisor request {} created for club {} and teacher {}",
        request.id, club.id, teacher.id
    );

    notify(
        &state,
        NewNotification::advisor_request(&teacher.user_id, &club.name, request.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(request)))
}

/// Approves or denies a pending request.
///
/// Approval reserves a club slot on the teacher first; when the teacher is
/// full the request stays pending and the caller gets 400. If the request
/// changed underneath us the reserved slot is given back.
#[axum::debug_handler]
pub async fn update_advisor_request_status(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateAdvisorRequestStatus>,
) -> Result<Json<AdvisorRequest>, AppError> {
    let (Some(request_id), Some(status)) = (payload.request_id, non_blank(&payload.status)) else {
        return Err(ClubError::required("request_id and status").into());
    };

    let next = status
        .parse::<AdvisorRequestStatus>()
        .ok()
        .filter(AdvisorRequestStatus::is_decision)
        .ok_or_else(|| {
            ClubError::Validation("Status must be 'approved' or 'denied'".to_string())
        })?;

    let current = state
        .advisor_requests
        .get_by_id(request_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Advisor request not found".to_string()))?;

    if !current.status.can_transition_to(next) {
        return Err(ClubError::Conflict(format!(
            "Cannot change advisor request from {} to {}",
            current.status, next
        ))
        .into());
    }

    let approving = next == AdvisorRequestStatus::Approved;
    if approving {
        let reserved = state
            .teachers
            .reserve_club_slot(current.teacher_id)
            .await
            .map_err(ClubError::Database)?;
        if !reserved {
            return Err(teacher_full().into());
        }
    }

    let updated = match state
        .advisor_requests
        .transition(request_id, current.status, next)
        .await
    {
        Ok(Some(updated)) => updated,
        outcome => {
            if approving {
                release_slot(&state, current.teacher_id).await;
            }
            return Err(match outcome {
                Err(err) => ClubError::Database(err),
                _ => ClubError::Conflict(
                    "Advisor request was changed by another request".to_string(),
                ),
            }
            .into());
        }
    };

    info!("Advisor request {} is now {}", updated.id, updated.status);

    notify(
        &state,
        NewNotification::request_decided(
            &updated.student_id,
            next,
            updated.club_name.as_deref().unwrap_or("your club"),
            updated.id,
        ),
    )
    .await;

    Ok(Json(updated))
}

/// Closes an approved request on behalf of the student who made it and
/// frees the teacher's club slot.
#[axum::debug_handler]
pub async fn close_advisor_request(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CloseAdvisorRequest>,
) -> Result<Json<AdvisorRequest>, AppError> {
    let (Some(request_id), Some(student_id)) = (payload.request_id, non_blank(&payload.student_id))
    else {
        return Err(ClubError::required("request_id and student_id").into());
    };

    let current = state
        .advisor_requests
        .get_by_id(request_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Advisor request not found".to_string()))?;

    if current.student_id != student_id {
        return Err(ClubError::Authorization(
            "Only the student who made the request can close it".to_string(),
        )
        .into());
    }
    if current.status != AdvisorRequestStatus::Approved {
        return Err(ClubError::Conflict(format!(
            "Only approved requests can be closed; this one is {}",
            current.status
        ))
        .into());
    }

    let updated = state
        .advisor_requests
        .transition(
            request_id,
            AdvisorRequestStatus::Approved,
            AdvisorRequestStatus::Closed,
        )
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| {
            ClubError::Conflict("Advisor request was changed by another request".to_string())
        })?;

    state
        .teachers
        .release_club_slot(updated.teacher_id)
        .await
        .map_err(ClubError::Database)?;

    info!("Advisor request {} closed by {}", updated.id, student_id);

    match state.teachers.get_by_id(updated.teacher_id).await {
        Ok(Some(teacher)) => {
            notify(
                &state,
                NewNotification::request_closed(
                    &teacher.user_id,
                    updated.club_name.as_deref().unwrap_or("A club"),
                    updated.id,
                ),
            )
            .await
        }
        Ok(None) => warn!("Teacher {} vanished before close notification", updated.teacher_id),
        Err(err) => warn!("Failed to look up teacher for close notification: {:?}", err),
    }

    Ok(Json(updated))
}

async fn release_slot(state: &ApiState, teacher_id: Uuid) {
    if let Err(err) = state.teachers.release_club_slot(teacher_id).await {
        warn!(
            "Failed to release club slot for teacher {}: {:?}",
            teacher_id, err
        );
    }
}

fn duplicate_request() -> ClubError {
    ClubError::Conflict(
        "An active advisor request already exists for this club and teacher".to_string(),
    )
}

fn teacher_full() -> ClubError {
    ClubError::Validation("Teacher has reached maximum club capacity".to_string())
}
