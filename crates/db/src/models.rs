//! Row types as they come out of Postgres, and their conversion into the
//! domain models from `clubly_core`. Status columns are stored as text, so
//! conversions that parse them are fallible.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clubly_core::models::{
    advisor_request::AdvisorRequest, availability::TeacherAvailability, club::Club,
    meeting_booking::MeetingBooking, notification::Notification, task::Task, teacher::Teacher,
};
use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
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

impl From<DbTeacher> for Teacher {
    fn from(row: DbTeacher) -> Self {
        Teacher {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            school_email: row.school_email,
            room_number: row.room_number,
            max_clubs: row.max_clubs,
            current_clubs_count: row.current_clubs_count,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClub {
    pub id: Uuid,
    pub name: String,
    pub owner_id: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbClub> for Club {
    fn from(row: DbClub) -> Self {
        Club {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// An advisor request joined with club and teacher names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdvisorRequest {
    pub id: Uuid,
    pub club_id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: String,
    pub message: Option<String>,
    pub proposed_day: Option<i16>,
    pub proposed_time: Option<NaiveTime>,
    pub status: String,
    pub club_name: Option<String>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAdvisorRequest> for AdvisorRequest {
    type Error = Report;

    fn try_from(row: DbAdvisorRequest) -> Result<Self, Self::Error> {
        Ok(AdvisorRequest {
            id: row.id,
            club_id: row.club_id,
            teacher_id: row.teacher_id,
            student_id: row.student_id,
            message: row.message,
            proposed_day: row.proposed_day,
            proposed_time: row.proposed_time,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            club_name: row.club_name,
            teacher_name: row.teacher_name,
            teacher_email: row.teacher_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbNotification {
    pub id: Uuid,
    pub user_id: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbNotification> for Notification {
    type Error = Report;

    fn try_from(row: DbNotification) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind.parse().map_err(|e: String| eyre!(e))?,
            title: row.title,
            message: row.message,
            related_id: row.related_id,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacherAvailability {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_number: Option<String>,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbTeacherAvailability> for TeacherAvailability {
    fn from(row: DbTeacherAvailability) -> Self {
        TeacherAvailability {
            id: row.id,
            teacher_id: row.teacher_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
            room_number: row.room_number,
            is_recurring: row.is_recurring,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A meeting booking joined with club and teacher names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMeetingBooking {
    pub id: Uuid,
    pub club_id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: String,
    pub meeting_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_number: Option<String>,
    pub purpose: Option<String>,
    pub status: String,
    pub club_name: Option<String>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbMeetingBooking> for MeetingBooking {
    type Error = Report;

    fn try_from(row: DbMeetingBooking) -> Result<Self, Self::Error> {
        Ok(MeetingBooking {
            id: row.id,
            club_id: row.club_id,
            teacher_id: row.teacher_id,
            student_id: row.student_id,
            meeting_date: row.meeting_date,
            start_time: row.start_time,
            end_time: row.end_time,
            room_number: row.room_number,
            purpose: row.purpose,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            club_name: row.club_name,
            teacher_name: row.teacher_name,
            teacher_email: row.teacher_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTask {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbTask> for Task {
    type Error = Report;

    fn try_from(row: DbTask) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            club_id: row.club_id,
            title: row.title,
            description: row.description,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            priority: row.priority.parse().map_err(|e: String| eyre!(e))?,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Converts a batch of rows, failing on the first one that does not parse.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, Report>
where
    T: TryFrom<R, Error = Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
