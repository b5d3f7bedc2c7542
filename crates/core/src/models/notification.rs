use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{advisor_request::AdvisorRequestStatus, meeting_booking::BookingStatus};

/// Default page size when listing notifications.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AdvisorRequest,
    RequestApproved,
    RequestDenied,
    RequestClosed,
    BookingConfirmed,
    BookingCancelled,
    AvailabilityUpdated,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AdvisorRequest => "advisor_request",
            NotificationType::RequestApproved => "request_approved",
            NotificationType::RequestDenied => "request_denied",
            NotificationType::RequestClosed => "request_closed",
            NotificationType::BookingConfirmed => "booking_confirmed",
            NotificationType::BookingCancelled => "booking_cancelled",
            NotificationType::AvailabilityUpdated => "availability_updated",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advisor_request" => Ok(NotificationType::AdvisorRequest),
            "request_approved" => Ok(NotificationType::RequestApproved),
            "request_denied" => Ok(NotificationType::RequestDenied),
            "request_closed" => Ok(NotificationType::RequestClosed),
            "booking_confirmed" => Ok(NotificationType::BookingConfirmed),
            "booking_cancelled" => Ok(NotificationType::BookingCancelled),
            "availability_updated" => Ok(NotificationType::AvailabilityUpdated),
            other => Err(format!("Invalid notification type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related_id: Option<Uuid>,
}

impl NewNotification {
    /// Tells a teacher a student asked them to advise a club.
    pub fn advisor_request(teacher_user_id: &str, club_name: &str, request_id: Uuid) -> Self {
        Self {
            user_id: teacher_user_id.to_string(),
            kind: NotificationType::AdvisorRequest,
            title: "New Advisor Request".to_string(),
            message: format!("You have a new advisor request for {}", club_name),
            related_id: Some(request_id),
        }
    }

    /// Tells a student how the teacher decided. `status` is approved or denied.
    pub fn request_decided(
        student_id: &str,
        status: AdvisorRequestStatus,
        club_name: &str,
        request_id: Uuid,
    ) -> Self {
        let (kind, title) = match status {
            AdvisorRequestStatus::Approved => {
                (NotificationType::RequestApproved, "Advisor Request Approved")
            }
            _ => (NotificationType::RequestDenied, "Advisor Request Denied"),
        };
        Self {
            user_id: student_id.to_string(),
            kind,
            title: title.to_string(),
            message: format!(
                "Your advisor request for {} has been {}",
                club_name, status
            ),
            related_id: Some(request_id),
        }
    }

    /// Tells a teacher a student ended the advising relationship.
    pub fn request_closed(teacher_user_id: &str, club_name: &str, request_id: Uuid) -> Self {
        Self {
            user_id: teacher_user_id.to_string(),
            kind: NotificationType::RequestClosed,
            title: "Advisor Relationship Ended".to_string(),
            message: format!("{} is no longer requesting you as an advisor", club_name),
            related_id: Some(request_id),
        }
    }

    pub fn booking_created(
        teacher_user_id: &str,
        club_name: &str,
        meeting_date: NaiveDate,
        booking_id: Uuid,
    ) -> Self {
        Self {
            user_id: teacher_user_id.to_string(),
            kind: NotificationType::BookingConfirmed,
            title: "New Meeting Booking".to_string(),
            message: format!(
                "You have a new meeting booking for {} on {}",
                club_name, meeting_date
            ),
            related_id: Some(booking_id),
        }
    }

    pub fn booking_updated(
        student_id: &str,
        status: BookingStatus,
        club_name: &str,
        booking_id: Uuid,
    ) -> Self {
        let (kind, title) = match status {
            BookingStatus::Cancelled => (NotificationType::BookingCancelled, "Meeting Cancelled"),
            _ => (NotificationType::BookingConfirmed, "Meeting Updated"),
        };
        Self {
            user_id: student_id.to_string(),
            kind,
            title: title.to_string(),
            message: format!("Your meeting for {} has been {}", club_name, status),
            related_id: Some(booking_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub related_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkReadRequest {
    pub user_id: Option<String>,
    pub notification_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub mark_all_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub message: String,
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub total: usize,
    pub unread_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationFilter {
    pub user_id: String,
    pub read: Option<bool>,
    pub kind: Option<NotificationType>,
    pub limit: i64,
    pub offset: i64,
}
