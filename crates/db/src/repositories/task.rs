use async_trait::async_trait;
use chrono::Utc;
use clubly_core::models::task::{NewTask, Task, TaskChanges};
use eyre::Result;
use uuid::Uuid;

use super::TaskRepository;
use crate::{
    models::{convert_all, DbTask},
    DbPool,
};

const TASK_COLUMNS: &str =
    "id, club_id, title, description, status, priority, due_date, created_at, updated_at";

pub struct PgTaskRepository {
    pool: DbPool,
}

impl PgTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: NewTask) -> Result<Task> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbTask>(&format!(
            r#"
            INSERT INTO tasks (id, club_id, title, description, status, priority, due_date,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(task.club_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Task::try_from(row)
    }

    async fn list(&self, club_id: Uuid) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, DbTask>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE club_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn update(&self, club_id: Uuid, id: Uuid, changes: TaskChanges) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, DbTask>(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date),
                updated_at = NOW()
            WHERE id = $1 AND club_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(club_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status.map(|status| status.as_str()))
        .bind(changes.priority.map(|priority| priority.as_str()))
        .bind(changes.due_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn delete(&self, club_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND club_id = $2")
            .bind(id)
            .bind(club_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
