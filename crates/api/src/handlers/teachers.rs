//! # Teacher Handlers
//!
//! Directory listing, registration and profile updates, plus the club-count
//! report used to repair `current_clubs_count` when it drifts from the
//! number of approved advisor requests.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use clubly_core::{
    errors::ClubError,
    models::{
        non_blank,
        teacher::{
            ClubCountEntry, ClubCountFixResponse, ClubCountReport, NewTeacher,
            RegisterTeacherRequest, Teacher, TeacherChanges, TeacherFilter,
            TeacherStatusResponse, TeacherWithAvailability, TeachersResponse,
            UpdateTeacherRequest, DEFAULT_MAX_CLUBS,
        },
    },
};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tracing::info;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Default, Deserialize)]
pub struct TeacherQuery {
    pub active_only: Option<bool>,
    pub has_availability: Option<bool>,
    /// Only teachers advising fewer clubs than this.
    pub max_clubs_available: Option<i32>,
    pub room_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeacherStatusQuery {
    pub user_id: Option<String>,
}

/// Lists teachers with their active availability attached.
///
/// # Endpoint
///
/// ```text
/// GET /api/teachers?active_only=true&has_availability=true&max_clubs_available=3&room_number=
/// ```
#[axum::debug_handler]
pub async fn list_teachers(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TeacherQuery>,
) -> Result<Json<TeachersResponse>, AppError> {
    let teachers = state
        .teachers
        .list(TeacherFilter {
            active_only: query.active_only.unwrap_or(false),
            room_number: non_blank(&query.room_number).map(str::to_string),
            below_club_count: query.max_clubs_available,
        })
        .await
        .map_err(ClubError::Database)?;

    let slots = if teachers.is_empty() {
        Vec::new()
    } else {
        state
            .availability
            .list_active_for_teachers(teachers.iter().map(|teacher| teacher.id).collect())
            .await
            .map_err(ClubError::Database)?
    };

    let mut by_teacher: HashMap<Uuid, Vec<_>> = HashMap::new();
    for slot in slots {
        by_teacher.entry(slot.teacher_id).or_default().push(slot);
    }

    let teachers: Vec<TeacherWithAvailability> = teachers
        .into_iter()
        .map(|teacher| TeacherWithAvailability {
            availability: by_teacher.remove(&teacher.id).unwrap_or_default(),
            teacher,
        })
        .filter(|entry| !query.has_availability.unwrap_or(false) || !entry.availability.is_empty())
        .collect();

    let total = teachers.len();
    Ok(Json(TeachersResponse { teachers, total }))
}

#[axum::debug_handler]
pub async fn register_teacher(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterTeacherRequest>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let (Some(user_id), Some(name), Some(email)) = (
        non_blank(&payload.user_id),
        non_blank(&payload.name),
        non_blank(&payload.email),
    ) else {
        return Err(ClubError::required("name, email, and user_id").into());
    };

    let max_clubs = payload.max_clubs.unwrap_or(DEFAULT_MAX_CLUBS);
    validate_max_clubs(max_clubs)?;

    let teacher = state
        .teachers
        .create(NewTeacher {
            user_id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            school_email: non_blank(&payload.school_email).map(str::to_string),
            room_number: non_blank(&payload.room_number).map(str::to_string),
            max_clubs,
        })
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| {
            ClubError::Conflict("Teacher already registered with this user ID".to_string())
        })?;

    info!("Registered teacher {} for user {}", teacher.id, teacher.user_id);
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[axum::debug_handler]
pub async fn update_teacher(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateTeacherRequest>,
) -> Result<Json<Teacher>, AppError> {
    let user_id = non_blank(&payload.user_id)
        .ok_or_else(|| ClubError::required("user_id"))?
        .to_string();

    if let Some(max_clubs) = payload.max_clubs {
        validate_max_clubs(max_clubs)?;
    }

    let changes = TeacherChanges {
        name: non_blank(&payload.name).map(str::to_string),
        email: non_blank(&payload.email).map(str::to_string),
        school_email: payload.school_email,
        room_number: payload.room_number,
        max_clubs: payload.max_clubs,
        active: payload.active,
    };

    let teacher = state
        .teachers
        .update_by_user_id(user_id, changes)
        .await
        .map_err(ClubError::Database)?
        .ok_or_else(|| ClubError::NotFound("Teacher not found".to_string()))?;

    Ok(Json(teacher))
}

/// Tells a signed-in user whether they are registered as a teacher.
#[axum::debug_handler]
pub async fn teacher_status(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TeacherStatusQuery>,
) -> Result<Json<TeacherStatusResponse>, AppError> {
    let user_id = non_blank(&query.user_id)
        .ok_or_else(|| ClubError::required("user_id"))?
        .to_string();

    let teacher = state
        .teachers
        .get_by_user_id(user_id)
        .await
        .map_err(ClubError::Database)?;

    Ok(Json(TeacherStatusResponse {
        is_teacher: teacher.is_some(),
        teacher_id: teacher.map(|teacher| teacher.id),
    }))
}

/// Compares every teacher's stored club count with their approved requests.
#[axum::debug_handler]
pub async fn club_count_report(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ClubCountReport>, AppError> {
    let (entries, total_approved_requests) = club_count_entries(&state).await?;
    let inconsistencies = entries.iter().filter(|entry| !entry.count_matches).count();

    Ok(Json(ClubCountReport {
        teachers: entries,
        total_approved_requests,
        inconsistencies,
    }))
}

/// Rewrites mismatched club counts to the number of approved requests.
#[axum::debug_handler]
pub async fn fix_club_counts(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ClubCountFixResponse>, AppError> {
    let (before, total_approved_requests) = club_count_entries(&state).await?;

    let mut updates_applied = 0;
    for entry in before.iter().filter(|entry| !entry.count_matches) {
        let count = i32::try_from(entry.actual_approved_requests).map_err(|_| {
            ClubError::Internal(
                format!("Approved request count out of range for {}", entry.id).into(),
            )
        })?;
        state
            .teachers
            .set_club_count(entry.id, count)
            .await
            .map_err(ClubError::Database)?;
        updates_applied += 1;
    }

    let (after, _) = club_count_entries(&state).await?;

    info!("Club counts repaired for {} teacher(s)", updates_applied);

    Ok(Json(ClubCountFixResponse {
        message: "Teacher club counts fixed successfully".to_string(),
        before,
        after,
        total_approved_requests,
        updates_applied,
    }))
}

async fn club_count_entries(state: &ApiState) -> Result<(Vec<ClubCountEntry>, i64), ClubError> {
    let teachers = state
        .teachers
        .list(TeacherFilter::default())
        .await
        .map_err(ClubError::Database)?;

    let approved: HashMap<Uuid, i64> = state
        .advisor_requests
        .approved_counts()
        .await
        .map_err(ClubError::Database)?
        .into_iter()
        .collect();

    let total = approved.values().sum();
    let entries = teachers
        .iter()
        .map(|teacher| {
            ClubCountEntry::new(teacher, approved.get(&teacher.id).copied().unwrap_or(0))
        })
        .collect();

    Ok((entries, total))
}

fn validate_max_clubs(max_clubs: i32) -> Result<(), ClubError> {
    if max_clubs < 1 {
        return Err(ClubError::Validation(
            "max_clubs must be at least 1".to_string(),
        ));
    }
    Ok(())
}
