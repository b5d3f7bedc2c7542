use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::availability::TeacherAvailability;

/// Club capacity given to teachers who register without choosing one.
pub const DEFAULT_MAX_CLUBS: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub school_email: Option<String>,
    pub room_number: Option<String>,
    pub max_clubs: i32,
    pub current_clubs_count: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Teacher {
    /// Whether the teacher can take on another club.
    pub fn has_capacity(&self) -> bool {
        self.current_clubs_count < self.max_clubs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherWithAvailability {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub availability: Vec<TeacherAvailability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachersResponse {
    pub teachers: Vec<TeacherWithAvailability>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterTeacherRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub school_email: Option<String>,
    pub room_number: Option<String>,
    pub max_clubs: Option<i32>,
}

/// Validated registration, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeacher {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub school_email: Option<String>,
    pub room_number: Option<String>,
    pub max_clubs: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeacherRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub school_email: Option<String>,
    pub room_number: Option<String>,
    pub max_clubs: Option<i32>,
    pub active: Option<bool>,
}

/// Profile fields a teacher may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub school_email: Option<String>,
    pub room_number: Option<String>,
    pub max_clubs: Option<i32>,
    pub active: Option<bool>,
}

/// Directory filters applied in the database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherFilter {
    pub active_only: bool,
    pub room_number: Option<String>,
    /// Only teachers whose current club count is below this number.
    pub below_club_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherStatusResponse {
    pub is_teacher: bool,
    pub teacher_id: Option<Uuid>,
}

/// A teacher's stored club count next to the number it should be.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClubCountEntry {
    pub id: Uuid,
    pub name: String,
    pub current_clubs_count: i32,
    pub max_clubs: i32,
    pub actual_approved_requests: i64,
    pub count_matches: bool,
}

impl ClubCountEntry {
    pub fn new(teacher: &Teacher, approved: i64) -> Self {
        Self {
            id: teacher.id,
            name: teacher.name.clone(),
            current_clubs_count: teacher.current_clubs_count,
            max_clubs: teacher.max_clubs,
            actual_approved_requests: approved,
            count_matches: i64::from(teacher.current_clubs_count) == approved,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubCountReport {
    pub teachers: Vec<ClubCountEntry>,
    pub total_approved_requests: i64,
    pub inconsistencies: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubCountFixResponse {
    pub message: String,
    pub before: Vec<ClubCountEntry>,
    pub after: Vec<ClubCountEntry>,
    pub total_approved_requests: i64,
    pub updates_applied: usize,
}
