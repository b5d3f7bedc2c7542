//! # Meeting Booking Handlers
//!
//! Students book meetings with the teacher advising their club. A booking
//! needs an approved advisor request for the club and teacher, and may not
//! overlap another confirmed booking of that teacher on the same date.
//! Ranges are half-open, so back-to-back meetings are fine.
//!
//! Status changes follow the booking lifecycle: a confirmed booking can be
//! cancelled or completed, and a cancelled one confirmed again if it still
//! fits. Overlap checks and writes happen atomically in the repository.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use clubly_core::{
    errors::ClubError,
    models::{
        advisor_request::{AdvisorRequestFilter, AdvisorRequestStatus},
        meeting_booking::{
            BookingFilter, BookingStatus, BookingWrite, BookingsResponse, ConflictQuery,
            ConflictResponse, CreateBookingRequest, MeetingBooking, NewMeetingBooking,
            UpdateBookingStatus,
        },
        non_blank,
        notification::NewNotification,
    },
    time::wall_clock_opt,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::notify;
use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub teacher_id: Option<Uuid>,
    pub club_id: Option<Uuid>,
    pub student_id: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckConflictQuery {
    pub teacher_id: Option<Uuid>,
    pub meeting_date: Option<NaiveDate>,
    #[serde(default, with = "wall_clock_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "wall_clock_opt")]
    pub end_time: Option<NaiveTime>,
    pub exclude_booking_id: Option<Uuid>,
}

fn parse_status(status: &str) -> Result<BookingStatus, ClubError> {
    status.parse().map_err(ClubError::Validation)
}

fn validate_range(start_time: NaiveTime, end_time: NaiveTime) -> Result<(), ClubError> {
    if start_time >= end_time {
        return Err(ClubError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}

fn conflict_response(conflicting_bookings: Vec<MeetingBooking>) -> Response {
    let body = Json(json!({
        "error": "Teacher already has a meeting booked at this time",
        "has_conflict": true,
        "conflicting_bookings": conflicting_bookings,
    }));
    (StatusCode::CONFLICT, body).into_response()
}

fn stale_booking() -> ClubError {
    ClubError::Conflict("Booking status changed, reload and try again".to_string())
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<BookingsResponse>, AppError> {
    let filter = BookingFilter {
        teacher_id: query.teacher_id,
        club_id: query.club_id,
        student_id: non_blank(&query.student_id).map(str::to_string),
        status: non_blank(&query.status).map(parse_status).transpose()?,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let bookings = state
        .bookings
        .list(filter)
        .await
        .map_err(ClubError::Database)?;

    let total = bookings.len();
    Ok(Json(BookingsResponse { bookings, total }))
}

/// Books a meeting and notifies the teacher.
///
/// A conflicting booking yields 409 with the bookings in the way, so the
/// client can show them without a second request.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    let (
        Some(club_id),
        Some(teacher_id),
        Some(student_id),
        Some(meeting_date),
        Some(start_time),
        Some(end_time),
    ) = (
        payload.club_id,
        payload.teacher_id,
        non_blank(&payload.student_id),
        payload.meeting_date,
        payload.start_time,
        payload.end_time,
    )
    else {
        return Err(ClubError::required(
            "club_id, teacher_id, student_id, meeting_date, start_time, and end_time",
        )
        .into());
    };
    validate_range(start_time, end_time)?;

    let teacher = state
        .teachers
        .get_by_id(teacher_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Teacher not found".to_string()))?;
    if !teacher.active {
        return Err(
            ClubError::Validation("Teacher is not currently active".to_string()).into(),
        );
    }

    let club = state
        .clubs
        .get_by_id(club_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Club not found".to_string()))?;

    let approved = state
        .advisor_requests
        .list(AdvisorRequestFilter {
            teacher_id: Some(teacher_id),
            club_id: Some(club_id),
            student_id: None,
            status: Some(AdvisorRequestStatus::Approved),
        })
        .await
        .map_err(ClubError::Database)?;
    if approved.is_empty() {
        return Err(ClubError::Validation(
            "Teacher is not an approved advisor for this club".to_string(),
        )
        .into());
    }

    let written = state
        .bookings
        .create(NewMeetingBooking {
            club_id,
            teacher_id,
            student_id: student_id.to_string(),
            meeting_date,
            start_time,
            end_time,
            room_number: non_blank(&payload.room_number)
                .map(str::to_string)
                .or_else(|| teacher.room_number.clone()),
            purpose: non_blank(&payload.purpose).map(str::to_string),
        })
        .await
        .map_err(ClubError::Database)?;
    let booking = match written {
        BookingWrite::Saved(booking) => booking,
        BookingWrite::Conflict(conflicts) => return Ok(conflict_response(conflicts)),
        BookingWrite::Stale => return Err(stale_booking().into()),
    };

    info!(
        "Booking {} created for teacher {} on {}",
        booking.id, teacher.id, booking.meeting_date
    );

    notify(
        &state,
        NewNotification::booking_created(&teacher.user_id, &club.name, meeting_date, booking.id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(booking)).into_response())
}

/// Moves a booking along its lifecycle and tells the student.
///
/// Reconfirming a cancelled booking that now overlaps another confirmed one
/// yields the same 409 body as creation.
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateBookingStatus>,
) -> Result<Response, AppError> {
    let (Some(booking_id), Some(status)) = (payload.booking_id, non_blank(&payload.status)) else {
        return Err(ClubError::required("booking_id and status").into());
    };
    let status = parse_status(status)?;

    let current = state
        .bookings
        .get_by_id(booking_id)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Booking not found".to_string()))?;

    if !current.status.can_transition_to(status) {
        return Err(ClubError::Conflict(format!(
            "Cannot change a {} booking to {}",
            current.status, status
        ))
        .into());
    }

    let written = state
        .bookings
        .update_status(booking_id, current.status, status)
        .await
        .map_err(ClubError::Database)?;
    let booking = match written {
        BookingWrite::Saved(booking) => booking,
        BookingWrite::Conflict(conflicts) => return Ok(conflict_response(conflicts)),
        BookingWrite::Stale => return Err(stale_booking().into()),
    };

    info!("Booking {} is now {}", booking.id, booking.status);

    notify(
        &state,
        NewNotification::booking_updated(
            &booking.student_id,
            status,
            booking.club_name.as_deref().unwrap_or("your club"),
            booking.id,
        ),
    )
    .await;

    Ok(Json(booking).into_response())
}

#[axum::debug_handler]
pub async fn check_conflict(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CheckConflictQuery>,
) -> Result<Json<ConflictResponse>, AppError> {
    let (Some(teacher_id), Some(meeting_date), Some(start_time), Some(end_time)) = (
        query.teacher_id,
        query.meeting_date,
        query.start_time,
        query.end_time,
    ) else {
        return Err(
            ClubError::required("teacher_id, meeting_date, start_time, and end_time").into(),
        );
    };
    validate_range(start_time, end_time)?;

    let conflicting_bookings = state
        .bookings
        .find_conflicts(ConflictQuery {
            teacher_id,
            meeting_date,
            start_time,
            end_time,
            exclude_booking_id: query.exclude_booking_id,
        })
        .await
        .map_err(ClubError::Database)?;

    Ok(Json(ConflictResponse {
        has_conflict: !conflicting_bookings.is_empty(),
        conflicting_bookings,
    }))
}
