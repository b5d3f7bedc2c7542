use axum::http::StatusCode;
use clubly_core::models::{
    advisor_request::AdvisorRequestStatus,
    meeting_booking::{BookingStatus, BookingWrite, ConflictResponse, MeetingBooking},
    notification::NotificationType,
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{
    advisor_request, booking, club, date, stored_notification, teacher, time, TestContext,
};

fn booking_body(club_id: Uuid, teacher_id: Uuid, start: &str, end: &str) -> Value {
    json!({
        "club_id": club_id,
        "teacher_id": teacher_id,
        "student_id": "student_1",
        "meeting_date": "2025-03-10",
        "start_time": start,
        "end_time": end,
        "purpose": "Plan the spring showcase",
    })
}

#[test_log::test(tokio::test)]
async fn test_create_booking_notifies_teacher() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 1, true);
    let club = club("Robotics");
    let approved = advisor_request(&club, &teacher, "student_1", AdvisorRequestStatus::Approved);
    let created = booking(&club, &teacher, "15:00", "15:30");

    let found = teacher.clone();
    ctx.teachers
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let found = club.clone();
    ctx.clubs
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.advisor_requests
        .expect_list()
        .withf(|filter| filter.status == Some(AdvisorRequestStatus::Approved))
        .returning(move |_| Ok(vec![approved.clone()]));
    let inserted = created.clone();
    ctx.bookings
        .expect_create()
        .withf(|new| {
            new.room_number.as_deref() == Some("B204")
                && new.purpose.is_some()
                && new.meeting_date == date("2025-03-10")
                && new.start_time == time("15:00")
                && new.end_time == time("15:30")
        })
        .times(1)
        .returning(move |_| Ok(BookingWrite::Saved(inserted.clone())));
    let teacher_user = teacher.user_id.clone();
    ctx.notifications
        .expect_create()
        .withf(move |n| n.user_id == teacher_user && n.kind == NotificationType::BookingConfirmed)
        .times(1)
        .returning(|n| Ok(stored_notification(n)));

    let response = ctx
        .server()
        .post("/api/meeting-bookings")
        .json(&booking_body(club.id, teacher.id, "15:00", "15:30"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: MeetingBooking = response.json();
    assert_eq!(body.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_overlapping_booking_conflicts_with_details() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 1, true);
    let club = club("Robotics");
    let approved = advisor_request(&club, &teacher, "student_1", AdvisorRequestStatus::Approved);
    let existing = booking(&club, &teacher, "15:00", "16:00");

    let found = teacher.clone();
    ctx.teachers
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let found = club.clone();
    ctx.clubs
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.advisor_requests
        .expect_list()
        .returning(move |_| Ok(vec![approved.clone()]));
    let blocking = existing.clone();
    ctx.bookings
        .expect_create()
        .times(1)
        .returning(move |_| Ok(BookingWrite::Conflict(vec![blocking.clone()])));
    ctx.notifications.expect_create().never();

    let response = ctx
        .server()
        .post("/api/meeting-bookings")
        .json(&booking_body(club.id, teacher.id, "15:30", "16:30"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["has_conflict"], true);
    assert_eq!(body["conflicting_bookings"][0]["id"], existing.id.to_string());
}

#[tokio::test]
async fn test_booking_requires_approved_advisor() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 0, true);
    let club = club("Robotics");

    let found = teacher.clone();
    ctx.teachers
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let found = club.clone();
    ctx.clubs
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.advisor_requests
        .expect_list()
        .returning(|_| Ok(Vec::new()));
    ctx.bookings.expect_create().never();

    let response = ctx
        .server()
        .post("/api/meeting-bookings")
        .json(&booking_body(club.id, teacher.id, "15:00", "15:30"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_validates_range_and_teacher() {
    let mut ctx = TestContext::new();
    ctx.teachers.expect_get_by_id().returning(|_| Ok(None));
    let server = ctx.server();

    let response = server
        .post("/api/meeting-bookings")
        .json(&booking_body(Uuid::new_v4(), Uuid::new_v4(), "16:00", "15:00"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/meeting-bookings")
        .json(&booking_body(Uuid::new_v4(), Uuid::new_v4(), "15:00", "16:00"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

fn with_booking_status(booking: MeetingBooking, status: BookingStatus) -> MeetingBooking {
    MeetingBooking { status, ..booking }
}

#[tokio::test]
async fn test_cancel_booking_notifies_student() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 1, true);
    let club = club("Robotics");
    let confirmed = booking(&club, &teacher, "15:00", "15:30");
    let cancelled = with_booking_status(confirmed.clone(), BookingStatus::Cancelled);
    let id = confirmed.id;

    ctx.bookings
        .expect_get_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(confirmed.clone())));
    ctx.bookings
        .expect_update_status()
        .with(eq(id), eq(BookingStatus::Confirmed), eq(BookingStatus::Cancelled))
        .times(1)
        .returning(move |_, _, _| Ok(BookingWrite::Saved(cancelled.clone())));
    ctx.notifications
        .expect_create()
        .withf(|n| n.user_id == "student_1" && n.kind == NotificationType::BookingCancelled)
        .times(1)
        .returning(|n| Ok(stored_notification(n)));

    let response = ctx
        .server()
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": id, "status": "cancelled" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: MeetingBooking = response.json();
    assert_eq!(body.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_reconfirming_cancelled_booking_rejects_overlap() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 1, true);
    let club = club("Robotics");
    let cancelled = with_booking_status(
        booking(&club, &teacher, "15:00", "16:00"),
        BookingStatus::Cancelled,
    );
    let taken = booking(&club, &teacher, "15:30", "16:30");
    let id = cancelled.id;

    ctx.bookings
        .expect_get_by_id()
        .returning(move |_| Ok(Some(cancelled.clone())));
    let blocking = taken.clone();
    ctx.bookings
        .expect_update_status()
        .with(eq(id), eq(BookingStatus::Cancelled), eq(BookingStatus::Confirmed))
        .times(1)
        .returning(move |_, _, _| Ok(BookingWrite::Conflict(vec![blocking.clone()])));
    ctx.notifications.expect_create().never();

    let response = ctx
        .server()
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": id, "status": "confirmed" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["has_conflict"], true);
    assert_eq!(body["conflicting_bookings"][0]["id"], taken.id.to_string());
}

#[tokio::test]
async fn test_reconfirming_cancelled_booking_that_fits() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 1, true);
    let club = club("Robotics");
    let confirmed = booking(&club, &teacher, "15:00", "16:00");
    let cancelled = with_booking_status(confirmed.clone(), BookingStatus::Cancelled);

    ctx.bookings
        .expect_get_by_id()
        .returning(move |_| Ok(Some(cancelled.clone())));
    ctx.bookings
        .expect_update_status()
        .returning(move |_, _, _| Ok(BookingWrite::Saved(confirmed.clone())));
    ctx.notifications
        .expect_create()
        .withf(|n| n.kind == NotificationType::BookingConfirmed)
        .times(1)
        .returning(|n| Ok(stored_notification(n)));

    let response = ctx
        .server()
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": Uuid::new_v4(), "status": "confirmed" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[rstest]
#[case(BookingStatus::Completed, "cancelled")]
#[case(BookingStatus::Completed, "confirmed")]
#[case(BookingStatus::Cancelled, "completed")]
#[case(BookingStatus::Confirmed, "confirmed")]
#[tokio::test]
async fn test_disallowed_booking_transitions(
    #[case] current: BookingStatus,
    #[case] requested: &str,
) {
    let mut ctx = TestContext::new();
    let stored = with_booking_status(
        booking(&club("Robotics"), &teacher(3, 1, true), "15:00", "16:00"),
        current,
    );

    ctx.bookings
        .expect_get_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    ctx.bookings.expect_update_status().never();
    ctx.notifications.expect_create().never();

    let response = ctx
        .server()
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": Uuid::new_v4(), "status": requested }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_concurrently_changed_booking_conflicts() {
    let mut ctx = TestContext::new();
    let stored = booking(&club("Robotics"), &teacher(3, 1, true), "15:00", "16:00");

    ctx.bookings
        .expect_get_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    ctx.bookings
        .expect_update_status()
        .returning(|_, _, _| Ok(BookingWrite::Stale));
    ctx.notifications.expect_create().never();

    let response = ctx
        .server()
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": Uuid::new_v4(), "status": "completed" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_booking_errors() {
    let mut ctx = TestContext::new();
    ctx.bookings.expect_get_by_id().returning(|_| Ok(None));
    ctx.bookings.expect_update_status().never();
    let server = ctx.server();

    let response = server
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": Uuid::new_v4(), "status": "postponed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .patch("/api/meeting-bookings")
        .json(&json!({ "booking_id": Uuid::new_v4(), "status": "completed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_conflict_passes_exclusion() {
    let mut ctx = TestContext::new();
    let teacher_id = Uuid::new_v4();
    let exclude = Uuid::new_v4();

    ctx.bookings
        .expect_find_conflicts()
        .withf(move |query| {
            query.teacher_id == teacher_id
                && query.start_time == time("10:00")
                && query.end_time == time("11:00")
                && query.exclude_booking_id == Some(exclude)
        })
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let response = ctx
        .server()
        .get("/api/meeting-bookings/check-conflict")
        .add_query_param("teacher_id", teacher_id)
        .add_query_param("meeting_date", "2025-03-10")
        .add_query_param("start_time", "10:00")
        .add_query_param("end_time", "11:00:00")
        .add_query_param("exclude_booking_id", exclude)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ConflictResponse = response.json();
    assert!(!body.has_conflict);
    assert!(body.conflicting_bookings.is_empty());
}

#[tokio::test]
async fn test_list_bookings() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 1, true);
    let club = club("Robotics");
    let rows = vec![
        booking(&club, &teacher, "09:00", "09:30"),
        booking(&club, &teacher, "09:30", "10:00"),
    ];

    ctx.bookings
        .expect_list()
        .withf(|filter| {
            filter.status == Some(BookingStatus::Confirmed)
                && filter.date_from == Some(date("2025-03-01"))
                && filter.date_to.is_none()
        })
        .returning(move |_| Ok(rows.clone()));

    let response = ctx
        .server()
        .get("/api/meeting-bookings")
        .add_query_param("status", "confirmed")
        .add_query_param("date_from", "2025-03-01")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["bookings"][1]["start_time"], "09:30:00");
}
