use async_trait::async_trait;
use chrono::Utc;
use clubly_core::models::availability::{AvailabilitySlot, TeacherAvailability};
use eyre::Result;
use uuid::Uuid;

use super::AvailabilityRepository;
use crate::{models::DbTeacherAvailability, DbPool};

const AVAILABILITY_COLUMNS: &str = "id, teacher_id, day_of_week, start_time, end_time, \
     room_number, is_recurring, is_active, created_at, updated_at";

pub struct PgAvailabilityRepository {
    pool: DbPool,
}

impl PgAvailabilityRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PgAvailabilityRepository {
    async fn list_active(&self, teacher_id: Uuid) -> Result<Vec<TeacherAvailability>> {
        let rows = sqlx::query_as::<_, DbTeacherAvailability>(&format!(
            r#"
            SELECT {}
            FROM teacher_availability
            WHERE teacher_id = $1 AND is_active
            ORDER BY day_of_week ASC, start_time ASC
            "#,
            AVAILABILITY_COLUMNS
        ))
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TeacherAvailability::from).collect())
    }

    async fn list_active_for_teachers(
        &self,
        teacher_ids: Vec<Uuid>,
    ) -> Result<Vec<TeacherAvailability>> {
        let rows = sqlx::query_as::<_, DbTeacherAvailability>(&format!(
            r#"
            SELECT {}
            FROM teacher_availability
            WHERE teacher_id = ANY($1) AND is_active
            ORDER BY teacher_id, day_of_week ASC, start_time ASC
            "#,
            AVAILABILITY_COLUMNS
        ))
        .bind(teacher_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TeacherAvailability::from).collect())
    }

    async fn replace(
        &self,
        teacher_id: Uuid,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<TeacherAvailability>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM teacher_availability WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(slots.len());
        for slot in slots {
            let row = sqlx::query_as::<_, DbTeacherAvailability>(&format!(
                r#"
                INSERT INTO teacher_availability (id, teacher_id, day_of_week, start_time, end_time,
                                                  room_number, is_recurring, is_active,
                                                  created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
                RETURNING {}
                "#,
                AVAILABILITY_COLUMNS
            ))
            .bind(Uuid::new_v4())
            .bind(teacher_id)
            .bind(slot.day_of_week)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .bind(slot.room_number)
            .bind(slot.is_recurring)
            .bind(slot.is_active)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(TeacherAvailability::from(row));
        }

        tx.commit().await?;

        tracing::debug!(
            "Replaced availability for teacher {} with {} slot(s)",
            teacher_id,
            inserted.len()
        );
        Ok(inserted)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<TeacherAvailability>> {
        let row = sqlx::query_as::<_, DbTeacherAvailability>(&format!(
            "SELECT {} FROM teacher_availability WHERE id = $1",
            AVAILABILITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TeacherAvailability::from))
    }

    async fn update(&self, slot: TeacherAvailability) -> Result<Option<TeacherAvailability>> {
        let row = sqlx::query_as::<_, DbTeacherAvailability>(&format!(
            r#"
            UPDATE teacher_availability
            SET day_of_week = $2, start_time = $3, end_time = $4, room_number = $5,
                is_recurring = $6, is_active = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            AVAILABILITY_COLUMNS
        ))
        .bind(slot.id)
        .bind(slot.day_of_week)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.room_number)
        .bind(slot.is_recurring)
        .bind(slot.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TeacherAvailability::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM teacher_availability WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
