use axum::http::StatusCode;
use clubly_core::models::notification::{
    NewNotification, Notification, NotificationFilter, NotificationType,
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{stored_notification, TestContext};

fn sample(user_id: &str, read: bool) -> Notification {
    Notification {
        read,
        ..stored_notification(NewNotification::advisor_request(
            user_id,
            "Robotics",
            Uuid::new_v4(),
        ))
    }
}

#[tokio::test]
async fn test_list_uses_defaults_and_reports_unread() {
    let mut ctx = TestContext::new();
    let rows = vec![sample("teacher_1", false), sample("teacher_1", true)];

    ctx.notifications
        .expect_list()
        .with(eq(NotificationFilter {
            user_id: "teacher_1".to_string(),
            read: None,
            kind: None,
            limit: 50,
            offset: 0,
        }))
        .times(1)
        .returning(move |_| Ok(rows.clone()));
    ctx.notifications
        .expect_count_unread()
        .with(eq("teacher_1".to_string()))
        .returning(|_| Ok(1));

    let response = ctx
        .server()
        .get("/api/notifications")
        .add_query_param("user_id", "teacher_1")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["unread_count"], 1);
    assert_eq!(body["notifications"][0]["type"], "advisor_request");
}

#[tokio::test]
async fn test_list_passes_filters() {
    let mut ctx = TestContext::new();
    ctx.notifications
        .expect_list()
        .withf(|filter| {
            filter.read == Some(false)
                && filter.kind == Some(NotificationType::RequestApproved)
                && filter.limit == 10
                && filter.offset == 20
        })
        .returning(|_| Ok(Vec::new()));
    ctx.notifications
        .expect_count_unread()
        .returning(|_| Ok(0));

    let response = ctx
        .server()
        .get("/api/notifications")
        .add_query_param("user_id", "student_1")
        .add_query_param("read", false)
        .add_query_param("type", "request_approved")
        .add_query_param("limit", 10)
        .add_query_param("offset", 20)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_requires_user_and_known_type() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/notifications").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/notifications")
        .add_query_param("user_id", "student_1")
        .add_query_param("type", "party_invite")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_notification() {
    let mut ctx = TestContext::new();
    let related = Uuid::new_v4();
    ctx.notifications
        .expect_create()
        .withf(move |n| {
            n.user_id == "student_1"
                && n.kind == NotificationType::BookingCancelled
                && n.related_id == Some(related)
        })
        .times(1)
        .returning(|n| Ok(stored_notification(n)));

    let response = ctx
        .server()
        .post("/api/notifications")
        .json(&json!({
            "user_id": "student_1",
            "type": "booking_cancelled",
            "title": "Meeting Cancelled",
            "message": "Your meeting was cancelled",
            "related_id": related,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Notification = response.json();
    assert!(!body.read);
}

#[tokio::test]
async fn test_create_notification_validates_input() {
    let mut ctx = TestContext::new();
    ctx.notifications.expect_create().never();
    let server = ctx.server();

    let response = server
        .post("/api/notifications")
        .json(&json!({ "user_id": "student_1", "type": "advisor_request", "title": "" , "message": "x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/notifications")
        .json(&json!({ "user_id": "student_1", "type": "gossip", "title": "t", "message": "m" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid notification type: gossip");
}

#[tokio::test]
async fn test_mark_read_by_ids_or_all() {
    let mut ctx = TestContext::new();
    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];

    ctx.notifications
        .expect_mark_read()
        .with(eq("student_1".to_string()), eq(Some(ids.clone())))
        .times(1)
        .returning(|_, _| Ok(2));
    ctx.notifications
        .expect_mark_read()
        .with(eq("student_1".to_string()), eq(None::<Vec<Uuid>>))
        .times(1)
        .returning(|_, _| Ok(5));

    let server = ctx.server();

    let response = server
        .patch("/api/notifications")
        .json(&json!({ "user_id": "student_1", "notification_ids": ids }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["updated"], 2);

    let response = server
        .patch("/api/notifications")
        .json(&json!({ "user_id": "student_1", "mark_all_read": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["updated"], 5);
}

#[tokio::test]
async fn test_mark_read_needs_ids_or_flag() {
    let mut ctx = TestContext::new();
    ctx.notifications.expect_mark_read().never();

    let response = ctx
        .server()
        .patch("/api/notifications")
        .json(&json!({ "user_id": "student_1", "notification_ids": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_single_and_read_notifications() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.notifications
        .expect_delete()
        .with(eq("student_1".to_string()), eq(Some(id)))
        .times(1)
        .returning(|_, _| Ok(0));
    ctx.notifications
        .expect_delete()
        .with(eq("student_1".to_string()), eq(None::<Uuid>))
        .times(1)
        .returning(|_, _| Ok(3));

    let server = ctx.server();

    let response = server
        .delete("/api/notifications")
        .add_query_param("user_id", "student_1")
        .add_query_param("notification_id", id)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .delete("/api/notifications")
        .add_query_param("user_id", "student_1")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Deleted 3 read notification(s)");
}
