use async_trait::async_trait;
use chrono::Utc;
use clubly_core::models::teacher::{NewTeacher, Teacher, TeacherChanges, TeacherFilter};
use eyre::Result;
use uuid::Uuid;

use super::TeacherRepository;
use crate::{models::DbTeacher, DbPool};

const TEACHER_COLUMNS: &str = "id, user_id, name, email, school_email, room_number, \
     max_clubs, current_clubs_count, active, created_at, updated_at";

pub struct PgTeacherRepository {
    pool: DbPool,
}

impl PgTeacherRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeacherRepository for PgTeacherRepository {
    async fn create(&self, teacher: NewTeacher) -> Result<Option<Teacher>> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbTeacher>(&format!(
            r#"
            INSERT INTO teachers (id, user_id, name, email, school_email, room_number,
                                  max_clubs, current_clubs_count, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, TRUE, $8, $8)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {}
            "#,
            TEACHER_COLUMNS
        ))
        .bind(id)
        .bind(&teacher.user_id)
        .bind(&teacher.name)
        .bind(&teacher.email)
        .bind(&teacher.school_email)
        .bind(&teacher.room_number)
        .bind(teacher.max_clubs)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Teacher::from))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Teacher>> {
        let row = sqlx::query_as::<_, DbTeacher>(&format!(
            "SELECT {} FROM teachers WHERE id = $1",
            TEACHER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Teacher::from))
    }

    async fn get_by_user_id(&self, user_id: String) -> Result<Option<Teacher>> {
        let row = sqlx::query_as::<_, DbTeacher>(&format!(
            "SELECT {} FROM teachers WHERE user_id = $1",
            TEACHER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Teacher::from))
    }

    async fn list(&self, filter: TeacherFilter) -> Result<Vec<Teacher>> {
        let rows = sqlx::query_as::<_, DbTeacher>(&format!(
            r#"
            SELECT {}
            FROM teachers
            WHERE (NOT $1 OR active)
              AND ($2::VARCHAR IS NULL OR room_number = $2)
              AND ($3::INTEGER IS NULL OR current_clubs_count < $3)
            ORDER BY name ASC
            "#,
            TEACHER_COLUMNS
        ))
        .bind(filter.active_only)
        .bind(filter.room_number)
        .bind(filter.below_club_count)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Teacher::from).collect())
    }

    async fn update_by_user_id(
        &self,
        user_id: String,
        changes: TeacherChanges,
    ) -> Result<Option<Teacher>> {
        let row = sqlx::query_as::<_, DbTeacher>(&format!(
            r#"
            UPDATE teachers
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                school_email = COALESCE($4, school_email),
                room_number = COALESCE($5, room_number),
                max_clubs = COALESCE($6, max_clubs),
                active = COALESCE($7, active),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {}
            "#,
            TEACHER_COLUMNS
        ))
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.school_email)
        .bind(changes.room_number)
        .bind(changes.max_clubs)
        .bind(changes.active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Teacher::from))
    }

    async fn reserve_club_slot(&self, id: Uuid) -> Result<bool> {
        // The capacity check and the increment happen in one statement
        let result = sqlx::query(
            r#"
            UPDATE teachers
            SET current_clubs_count = current_clubs_count + 1, updated_at = NOW()
            WHERE id = $1 AND current_clubs_count < max_clubs
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Reserve club slot for teacher {}: {} row(s)", id, result.rows_affected());
        Ok(result.rows_affected() == 1)
    }

    async fn release_club_slot(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE teachers
            SET current_clubs_count = GREATEST(current_clubs_count - 1, 0), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_club_count(&self, id: Uuid, count: i32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE teachers
            SET current_clubs_count = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
