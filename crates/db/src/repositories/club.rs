use async_trait::async_trait;
use chrono::Utc;
use clubly_core::models::club::{Club, NewClub};
use eyre::Result;
use uuid::Uuid;

use super::ClubRepository;
use crate::{models::DbClub, DbPool};

pub struct PgClubRepository {
    pool: DbPool,
}

impl PgClubRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClubRepository for PgClubRepository {
    async fn create(&self, club: NewClub) -> Result<Club> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, DbClub>(
            r#"
            INSERT INTO clubs (id, name, owner_id, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, owner_id, description, created_at
            "#,
        )
        .bind(id)
        .bind(&club.name)
        .bind(&club.owner_id)
        .bind(&club.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Club>> {
        let row = sqlx::query_as::<_, DbClub>(
            r#"
            SELECT id, name, owner_id, description, created_at
            FROM clubs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Club::from))
    }
}
