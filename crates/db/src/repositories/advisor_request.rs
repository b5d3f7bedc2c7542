use async_trait::async_trait;
use chrono::Utc;
use clubly_core::models::advisor_request::{
    AdvisorRequest, AdvisorRequestFilter, AdvisorRequestStatus, NewAdvisorRequest,
};
use eyre::Result;
use uuid::Uuid;

use super::AdvisorRequestRepository;
use crate::{
    models::{convert_all, DbAdvisorRequest},
    DbPool,
};

/// Projection shared by every query; expects the request aliased as `ar`.
const JOINED_SELECT: &str = r#"
    SELECT ar.id, ar.club_id, ar.teacher_id, ar.student_id, ar.message,
           ar.proposed_day, ar.proposed_time, ar.status,
           c.name AS club_name, t.name AS teacher_name, t.email AS teacher_email,
           ar.created_at, ar.updated_at
"#;

const JOINS: &str = r#"
    LEFT JOIN clubs c ON c.id = ar.club_id
    LEFT JOIN teachers t ON t.id = ar.teacher_id
"#;

pub struct PgAdvisorRequestRepository {
    pool: DbPool,
}

impl PgAdvisorRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdvisorRequestRepository for PgAdvisorRequestRepository {
    async fn find_live(
        &self,
        club_id: Uuid,
        teacher_id: Uuid,
        student_id: String,
    ) -> Result<Option<AdvisorRequest>> {
        let row = sqlx::query_as::<_, DbAdvisorRequest>(&format!(
            r#"
            {JOINED_SELECT}
            FROM advisor_requests ar
            {JOINS}
            WHERE ar.club_id = $1 AND ar.teacher_id = $2 AND ar.student_id = $3
              AND ar.status IN ('pending', 'approved')
            LIMIT 1
            "#
        ))
        .bind(club_id)
        .bind(teacher_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdvisorRequest::try_from).transpose()
    }

    async fn create(&self, request: NewAdvisorRequest) -> Result<Option<AdvisorRequest>> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        tracing::debug!(
            "Creating advisor request: id={}, club_id={}, teacher_id={}",
            id,
            request.club_id,
            request.teacher_id
        );

        // The partial unique index turns a concurrent duplicate into an empty result
        let row = sqlx::query_as::<_, DbAdvisorRequest>(&format!(
            r#"
            WITH ar AS (
                INSERT INTO advisor_requests (id, club_id, teacher_id, student_id, message,
                                              proposed_day, proposed_time, status,
                                              created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $8)
                ON CONFLICT (club_id, teacher_id, student_id)
                    WHERE status IN ('pending', 'approved')
                    DO NOTHING
                RETURNING *
            )
            {JOINED_SELECT}
            FROM ar
            {JOINS}
            "#
        ))
        .bind(id)
        .bind(request.club_id)
        .bind(request.teacher_id)
        .bind(&request.student_id)
        .bind(&request.message)
        .bind(request.proposed_day)
        .bind(request.proposed_time)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdvisorRequest::try_from).transpose()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AdvisorRequest>> {
        let row = sqlx::query_as::<_, DbAdvisorRequest>(&format!(
            r#"
            {JOINED_SELECT}
            FROM advisor_requests ar
            {JOINS}
            WHERE ar.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AdvisorRequest::try_from).transpose()
    }

    async fn list(&self, filter: AdvisorRequestFilter) -> Result<Vec<AdvisorRequest>> {
        let rows = sqlx::query_as::<_, DbAdvisorRequest>(&format!(
            r#"
            {JOINED_SELECT}
            FROM advisor_requests ar
            {JOINS}
            WHERE ($1::UUID IS NULL OR ar.teacher_id = $1)
              AND ($2::UUID IS NULL OR ar.club_id = $2)
              AND ($3::VARCHAR IS NULL OR ar.student_id = $3)
              AND ($4::VARCHAR IS NULL OR ar.status = $4)
            ORDER BY ar.created_at DESC
            "#
        ))
        .bind(filter.teacher_id)
        .bind(filter.club_id)
        .bind(filter.student_id)
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: AdvisorRequestStatus,
        to: AdvisorRequestStatus,
    ) -> Result<Option<AdvisorRequest>> {
        let row = sqlx::query_as::<_, DbAdvisorRequest>(&format!(
            r#"
            WITH ar AS (
                UPDATE advisor_requests
                SET status = $3, updated_at = NOW()
                WHERE id = $1 AND status = $2
                RETURNING *
            )
            {JOINED_SELECT}
            FROM ar
            {JOINS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        tracing::debug!("Advisor request {} {} -> {}: {}", id, from, to, row.is_some());
        row.map(AdvisorRequest::try_from).transpose()
    }

    async fn approved_counts(&self) -> Result<Vec<(Uuid, i64)>> {
        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT teacher_id, COUNT(*) AS approved
            FROM advisor_requests
            WHERE status = 'approved'
            GROUP BY teacher_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
