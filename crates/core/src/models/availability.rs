use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{ClubError, ClubResult},
    time::{wall_clock, wall_clock_opt},
};

/// Days are numbered from Sunday (0) to Saturday (6).
pub const MAX_DAY_OF_WEEK: i16 = 6;

fn default_true() -> bool {
    true
}

/// One weekly office-hours slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherAvailability {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: i16,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    pub room_number: Option<String>,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    pub day_of_week: i16,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_recurring: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl AvailabilitySlot {
    pub fn validate(&self) -> ClubResult<()> {
        validate_slot(self.day_of_week, self.start_time, self.end_time)
    }
}

/// Checks that the day is in range and the slot has positive length.
pub fn validate_slot(day_of_week: i16, start_time: NaiveTime, end_time: NaiveTime) -> ClubResult<()> {
    if !(0..=MAX_DAY_OF_WEEK).contains(&day_of_week) {
        return Err(ClubError::Validation(format!(
            "day_of_week must be between 0 and {}, got {}",
            MAX_DAY_OF_WEEK, day_of_week
        )));
    }
    if start_time >= end_time {
        return Err(ClubError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceAvailabilityRequest {
    pub teacher_id: Option<Uuid>,
    pub availability: Option<Vec<AvailabilitySlot>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub availability: Vec<TeacherAvailability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceAvailabilityResponse {
    pub availability: Vec<TeacherAvailability>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability_id: Option<Uuid>,
    pub day_of_week: Option<i16>,
    #[serde(default, with = "wall_clock_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "wall_clock_opt")]
    pub end_time: Option<NaiveTime>,
    pub room_number: Option<String>,
    pub is_recurring: Option<bool>,
    pub is_active: Option<bool>,
}

impl UpdateAvailabilityRequest {
    /// Applies the requested changes over an existing slot.
    pub fn merge_into(&self, current: &TeacherAvailability) -> TeacherAvailability {
        TeacherAvailability {
            day_of_week: self.day_of_week.unwrap_or(current.day_of_week),
            start_time: self.start_time.unwrap_or(current.start_time),
            end_time: self.end_time.unwrap_or(current.end_time),
            room_number: self
                .room_number
                .clone()
                .or_else(|| current.room_number.clone()),
            is_recurring: self.is_recurring.unwrap_or(current.is_recurring),
            is_active: self.is_active.unwrap_or(current.is_active),
            ..current.clone()
        }
    }
}
