use axum::http::StatusCode;
use clubly_core::models::task::{
    NewTask, Task, TaskChanges, TaskPriority, TaskStatus, TasksResponse,
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{club, date, stored_task, TestContext};

fn task(club_id: Uuid, title: &str) -> Task {
    stored_task(NewTask {
        club_id,
        title: title.to_string(),
        description: None,
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        due_date: None,
    })
}

#[tokio::test]
async fn test_list_tasks_for_club() {
    let mut ctx = TestContext::new();
    let club_id = Uuid::new_v4();
    let rows = vec![task(club_id, "Book a room"), task(club_id, "Order pizza")];

    ctx.tasks
        .expect_list()
        .with(eq(club_id))
        .times(1)
        .returning(move |_| Ok(rows.clone()));

    let response = ctx
        .server()
        .get("/api/tasks")
        .add_query_param("club_id", club_id)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: TasksResponse = response.json();
    assert_eq!(body.total, 2);
    assert_eq!(body.tasks[1].title, "Order pizza");
}

#[tokio::test]
async fn test_list_tasks_requires_club() {
    let mut ctx = TestContext::new();
    ctx.tasks.expect_list().never();

    let response = ctx.server().get("/api/tasks").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_applies_defaults() {
    let mut ctx = TestContext::new();
    let club = club("Debate");

    let found = club.clone();
    ctx.clubs
        .expect_get_by_id()
        .with(eq(club.id))
        .returning(move |_| Ok(Some(found.clone())));
    let club_id = club.id;
    ctx.tasks
        .expect_create()
        .withf(move |new| {
            *new == NewTask {
                club_id,
                title: "Print flyers".to_string(),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::Medium,
                due_date: Some(date("2025-04-01")),
            }
        })
        .times(1)
        .returning(|new| Ok(stored_task(new)));

    let response = ctx
        .server()
        .post("/api/tasks")
        .json(&json!({
            "club_id": club.id,
            "task": { "title": "  Print flyers ", "description": "", "due_date": "2025-04-01" },
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "todo");
    assert_eq!(body["priority"], "medium");
}

#[tokio::test]
async fn test_create_task_validation() {
    let mut ctx = TestContext::new();
    ctx.clubs.expect_get_by_id().returning(|_| Ok(None));
    ctx.tasks.expect_create().never();
    let server = ctx.server();

    let response = server
        .post("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4(), "task": { "title": " " } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4(), "task": { "title": "Plan", "status": "blocked" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid task status: blocked");

    let response = server
        .post("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4(), "task": { "title": "Plan" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_task_passes_only_given_fields() {
    let mut ctx = TestContext::new();
    let club_id = Uuid::new_v4();
    let updated = Task {
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        ..task(club_id, "Book a room")
    };
    let task_id = updated.id;

    ctx.tasks
        .expect_update()
        .with(
            eq(club_id),
            eq(task_id),
            eq(TaskChanges {
                status: Some(TaskStatus::InProgress),
                priority: Some(TaskPriority::High),
                ..TaskChanges::default()
            }),
        )
        .times(1)
        .returning(move |_, _, _| Ok(Some(updated.clone())));

    let response = ctx
        .server()
        .put("/api/tasks")
        .json(&json!({
            "club_id": club_id,
            "task_id": task_id,
            "task": { "status": "in_progress", "priority": "high" },
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Task = response.json();
    assert_eq!(body.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn test_update_task_errors() {
    let mut ctx = TestContext::new();
    ctx.tasks.expect_update().returning(|_, _, _| Ok(None));
    let server = ctx.server();

    let response = server
        .put("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4(), "task": { "title": "x" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .put("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4(), "task_id": Uuid::new_v4(), "task": { "title": "" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .put("/api/tasks")
        .json(&json!({ "club_id": Uuid::new_v4(), "task_id": Uuid::new_v4(), "task": { "title": "x" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task() {
    let mut ctx = TestContext::new();
    let club_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();
    let missing = Uuid::new_v4();

    ctx.tasks
        .expect_delete()
        .with(eq(club_id), eq(task_id))
        .times(1)
        .returning(|_, _| Ok(true));
    ctx.tasks
        .expect_delete()
        .with(eq(club_id), eq(missing))
        .returning(|_, _| Ok(false));

    let server = ctx.server();

    let response = server
        .delete("/api/tasks")
        .add_query_param("club_id", club_id)
        .add_query_param("task_id", task_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .delete("/api/tasks")
        .add_query_param("club_id", club_id)
        .add_query_param("task_id", missing)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .delete("/api/tasks")
        .add_query_param("club_id", club_id)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
