use std::sync::Arc;

use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime, Utc};
use clubly_api::{app, ApiState};
use clubly_core::models::{
    advisor_request::{AdvisorRequest, AdvisorRequestStatus},
    availability::TeacherAvailability,
    club::Club,
    meeting_booking::{BookingStatus, MeetingBooking},
    notification::{NewNotification, Notification},
    task::{NewTask, Task},
    teacher::Teacher,
};
use clubly_db::mock::repositories::{
    MockAdvisorRequestRepo, MockAvailabilityRepo, MockClubRepo, MockMeetingBookingRepo,
    MockNotificationRepo, MockTaskRepo, MockTeacherRepo,
};
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name},
    Fake,
};
use uuid::Uuid;

/// One mock per repository. Set expectations, then call [`TestContext::server`].
pub struct TestContext {
    pub teachers: MockTeacherRepo,
    pub clubs: MockClubRepo,
    pub advisor_requests: MockAdvisorRequestRepo,
    pub availability: MockAvailabilityRepo,
    pub notifications: MockNotificationRepo,
    pub bookings: MockMeetingBookingRepo,
    pub tasks: MockTaskRepo,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            teachers: MockTeacherRepo::new(),
            clubs: MockClubRepo::new(),
            advisor_requests: MockAdvisorRequestRepo::new(),
            availability: MockAvailabilityRepo::new(),
            notifications: MockNotificationRepo::new(),
            bookings: MockMeetingBookingRepo::new(),
            tasks: MockTaskRepo::new(),
        }
    }

    /// Builds the real router over the mocks.
    pub fn server(self) -> TestServer {
        let state = Arc::new(ApiState {
            teachers: Arc::new(self.teachers),
            clubs: Arc::new(self.clubs),
            advisor_requests: Arc::new(self.advisor_requests),
            availability: Arc::new(self.availability),
            notifications: Arc::new(self.notifications),
            bookings: Arc::new(self.bookings),
            tasks: Arc::new(self.tasks),
        });

        TestServer::new(app(state)).expect("test server should start")
    }

    /// Accepts any notification and echoes it back as stored.
    pub fn accept_notifications(&mut self) {
        self.notifications
            .expect_create()
            .returning(|notification| Ok(stored_notification(notification)));
    }
}

pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").expect("valid test time")
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

pub fn teacher(max_clubs: i32, current_clubs_count: i32, active: bool) -> Teacher {
    let now = Utc::now();
    Teacher {
        id: Uuid::new_v4(),
        user_id: format!("user_{}", Uuid::new_v4().simple()),
        name: Name().fake(),
        email: SafeEmail().fake(),
        school_email: None,
        room_number: Some("B204".to_string()),
        max_clubs,
        current_clubs_count,
        active,
        created_at: now,
        updated_at: now,
    }
}

pub fn club(name: &str) -> Club {
    Club {
        id: Uuid::new_v4(),
        name: name.to_string(),
        owner_id: "student_owner".to_string(),
        description: None,
        created_at: Utc::now(),
    }
}

pub fn advisor_request(
    club: &Club,
    teacher: &Teacher,
    student_id: &str,
    status: AdvisorRequestStatus,
) -> AdvisorRequest {
    let now = Utc::now();
    AdvisorRequest {
        id: Uuid::new_v4(),
        club_id: club.id,
        teacher_id: teacher.id,
        student_id: student_id.to_string(),
        message: None,
        proposed_day: None,
        proposed_time: None,
        status,
        club_name: Some(club.name.clone()),
        teacher_name: Some(teacher.name.clone()),
        teacher_email: Some(teacher.email.clone()),
        created_at: now,
        updated_at: now,
    }
}

pub fn with_status(request: &AdvisorRequest, status: AdvisorRequestStatus) -> AdvisorRequest {
    AdvisorRequest {
        status,
        ..request.clone()
    }
}

pub fn slot(teacher_id: Uuid, day_of_week: i16, start: &str, end: &str) -> TeacherAvailability {
    let now = Utc::now();
    TeacherAvailability {
        id: Uuid::new_v4(),
        teacher_id,
        day_of_week,
        start_time: time(start),
        end_time: time(end),
        room_number: None,
        is_recurring: true,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn booking(club: &Club, teacher: &Teacher, start: &str, end: &str) -> MeetingBooking {
    let now = Utc::now();
    MeetingBooking {
        id: Uuid::new_v4(),
        club_id: club.id,
        teacher_id: teacher.id,
        student_id: "student_1".to_string(),
        meeting_date: date("2025-03-10"),
        start_time: time(start),
        end_time: time(end),
        room_number: teacher.room_number.clone(),
        purpose: None,
        status: BookingStatus::Confirmed,
        club_name: Some(club.name.clone()),
        teacher_name: Some(teacher.name.clone()),
        teacher_email: Some(teacher.email.clone()),
        created_at: now,
        updated_at: now,
    }
}

pub fn stored_notification(notification: NewNotification) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        user_id: notification.user_id,
        kind: notification.kind,
        title: notification.title,
        message: notification.message,
        related_id: notification.related_id,
        read: false,
        created_at: Utc::now(),
    }
}

pub fn stored_task(task: NewTask) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4(),
        club_id: task.club_id,
        title: task.title,
        description: task.description,
        status: task.status,
        priority: task.priority,
        due_date: task.due_date,
        created_at: now,
        updated_at: now,
    }
}
