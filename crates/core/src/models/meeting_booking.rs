//! Meeting bookings between a club's student and its advisor.
//!
//! ```text
//! confirmed ──► completed
//!    ▲  │
//!    │  ▼
//!  cancelled
//! ```
//!
//! A cancelled booking may be confirmed again as long as it still fits
//! around the teacher's other confirmed bookings. Completed is final.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{ranges_overlap, wall_clock, wall_clock_opt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (Confirmed, Cancelled) | (Confirmed, Completed) | (Cancelled, Confirmed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeetingBooking {
    pub id: Uuid,
    pub club_id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: String,
    pub meeting_date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    pub room_number: Option<String>,
    pub purpose: Option<String>,
    pub status: BookingStatus,
    pub club_name: Option<String>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeetingBooking {
    /// Whether this booking blocks the given range on its own date.
    pub fn conflicts_with(&self, start_time: NaiveTime, end_time: NaiveTime) -> bool {
        self.status == BookingStatus::Confirmed
            && ranges_overlap(self.start_time, self.end_time, start_time, end_time)
    }
}

/// Outcome of a write that must keep a teacher's confirmed bookings apart.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingWrite {
    Saved(MeetingBooking),
    /// Confirmed bookings the write would have overlapped.
    Conflict(Vec<MeetingBooking>),
    /// The booking was no longer in the expected status.
    Stale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsResponse {
    pub bookings: Vec<MeetingBooking>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub club_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub student_id: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    #[serde(default, with = "wall_clock_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "wall_clock_opt")]
    pub end_time: Option<NaiveTime>,
    pub room_number: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMeetingBooking {
    pub club_id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: String,
    pub meeting_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_number: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingStatus {
    pub booking_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResponse {
    pub has_conflict: bool,
    pub conflicting_bookings: Vec<MeetingBooking>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub teacher_id: Option<Uuid>,
    pub club_id: Option<Uuid>,
    pub student_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Looks for confirmed bookings of one teacher overlapping a range on a date.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictQuery {
    pub teacher_id: Uuid,
    pub meeting_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub exclude_booking_id: Option<Uuid>,
}
