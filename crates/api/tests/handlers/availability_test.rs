use axum::http::StatusCode;
use clubly_core::models::availability::{AvailabilityResponse, TeacherAvailability};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{slot, teacher, time, TestContext};

#[tokio::test]
async fn test_replace_then_get_returns_the_single_slot() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 0, true);
    let stored = slot(teacher.id, 1, "09:00", "10:00");

    let found = teacher.clone();
    ctx.teachers
        .expect_get_by_id()
        .with(eq(teacher.id))
        .returning(move |_| Ok(Some(found.clone())));
    let inserted = stored.clone();
    ctx.availability
        .expect_replace()
        .withf(move |teacher_id, slots| {
            *teacher_id == inserted.teacher_id
                && slots.len() == 1
                && slots[0].day_of_week == 1
                && slots[0].start_time == time("09:00")
                && slots[0].end_time == time("10:00")
                && slots[0].is_recurring
                && slots[0].is_active
        })
        .times(1)
        .returning({
            let stored = stored.clone();
            move |_, _| Ok(vec![stored.clone()])
        });
    let listed = stored.clone();
    ctx.availability
        .expect_list_active()
        .with(eq(teacher.id))
        .returning(move |_| Ok(vec![listed.clone()]));

    let server = ctx.server();

    let response = server
        .post("/api/teachers/availability")
        .json(&json!({
            "teacher_id": teacher.id,
            "availability": [{ "day_of_week": 1, "start_time": "09:00", "end_time": "10:00" }],
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Availability updated successfully");

    let response = server
        .get("/api/teachers/availability")
        .add_query_param("teacher_id", teacher.id)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: AvailabilityResponse = response.json();
    assert_eq!(body.availability, vec![stored]);

    let raw: Value = response.json();
    assert_eq!(raw["availability"][0]["start_time"], "09:00:00");
}

#[tokio::test]
async fn test_replace_with_empty_list_clears_slots() {
    let mut ctx = TestContext::new();
    let teacher = teacher(3, 0, true);

    let found = teacher.clone();
    ctx.teachers
        .expect_get_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ctx.availability
        .expect_replace()
        .withf(|_, slots| slots.is_empty())
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let response = ctx
        .server()
        .post("/api/teachers/availability")
        .json(&json!({ "teacher_id": teacher.id, "availability": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["availability"], json!([]));
}

#[tokio::test]
async fn test_replace_rejects_invalid_slots_before_writing() {
    let bad_slots = [
        json!({ "day_of_week": 7, "start_time": "09:00", "end_time": "10:00" }),
        json!({ "day_of_week": 2, "start_time": "10:00", "end_time": "10:00" }),
        json!({ "day_of_week": 2, "start_time": "11:00", "end_time": "10:00" }),
    ];

    for bad in bad_slots {
        let mut ctx = TestContext::new();
        let teacher = teacher(3, 0, true);
        let found = teacher.clone();
        ctx.teachers
            .expect_get_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        ctx.availability.expect_replace().never();

        let response = ctx
            .server()
            .post("/api/teachers/availability")
            .json(&json!({
                "teacher_id": teacher.id,
                "availability": [
                    { "day_of_week": 1, "start_time": "09:00", "end_time": "10:00" },
                    bad,
                ],
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_replace_for_unknown_teacher() {
    let mut ctx = TestContext::new();
    ctx.teachers.expect_get_by_id().returning(|_| Ok(None));
    ctx.availability.expect_replace().never();

    let response = ctx
        .server()
        .post("/api/teachers/availability")
        .json(&json!({ "teacher_id": Uuid::new_v4(), "availability": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_availability_requires_teacher_id() {
    let ctx = TestContext::new();

    let response = ctx.server().get("/api/teachers/availability").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "teacher_id required");
}

#[tokio::test]
async fn test_update_slot_merges_and_validates() {
    let mut ctx = TestContext::new();
    let current = slot(Uuid::new_v4(), 2, "13:00", "14:00");

    let found = current.clone();
    ctx.availability
        .expect_get_by_id()
        .with(eq(current.id))
        .returning(move |_| Ok(Some(found.clone())));
    ctx.availability
        .expect_update()
        .withf(|slot: &TeacherAvailability| {
            slot.day_of_week == 2
                && slot.start_time == time("13:30")
                && slot.end_time == time("14:00")
                && slot.room_number.as_deref() == Some("A101")
        })
        .times(1)
        .returning(|slot| Ok(Some(slot)));

    let response = ctx
        .server()
        .patch("/api/teachers/availability")
        .json(&json!({ "availability_id": current.id, "start_time": "13:30", "room_number": "A101" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: TeacherAvailability = response.json();
    assert_eq!(body.start_time, time("13:30"));
}

#[tokio::test]
async fn test_update_slot_rejects_inverted_range() {
    let mut ctx = TestContext::new();
    let current = slot(Uuid::new_v4(), 2, "13:00", "14:00");

    ctx.availability
        .expect_get_by_id()
        .returning(move |_| Ok(Some(current.clone())));
    ctx.availability.expect_update().never();

    let response = ctx
        .server()
        .patch("/api/teachers/availability")
        .json(&json!({ "availability_id": Uuid::new_v4(), "start_time": "15:00" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_slot() {
    let mut ctx = TestContext::new();
    ctx.availability.expect_get_by_id().returning(|_| Ok(None));

    let response = ctx
        .server()
        .patch("/api/teachers/availability")
        .json(&json!({ "availability_id": Uuid::new_v4(), "is_active": false }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_slot() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    ctx.availability
        .expect_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(true));

    let server = ctx.server();
    let response = server
        .delete("/api/teachers/availability")
        .add_query_param("availability_id", id)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server.delete("/api/teachers/availability").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
