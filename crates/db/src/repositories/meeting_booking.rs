//! Bookings must never overlap for a teacher. Writes that can create a
//! confirmed booking take a transaction-scoped advisory lock keyed by
//! teacher and date, then check for overlaps and write while holding it.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clubly_core::models::meeting_booking::{
    BookingFilter, BookingStatus, BookingWrite, ConflictQuery, MeetingBooking, NewMeetingBooking,
};
use eyre::Result;
use sqlx::PgConnection;
use uuid::Uuid;

use super::MeetingBookingRepository;
use crate::{
    models::{convert_all, DbMeetingBooking},
    DbPool,
};

const JOINED_SELECT: &str = r#"
    SELECT mb.id, mb.club_id, mb.teacher_id, mb.student_id, mb.meeting_date,
           mb.start_time, mb.end_time, mb.room_number, mb.purpose, mb.status,
           c.name AS club_name, t.name AS teacher_name, t.email AS teacher_email,
           mb.created_at, mb.updated_at
"#;

const JOINS: &str = r#"
    LEFT JOIN clubs c ON c.id = mb.club_id
    LEFT JOIN teachers t ON t.id = mb.teacher_id
"#;

/// Serializes writes for one teacher's day until the transaction ends.
async fn lock_teacher_day(conn: &mut PgConnection, teacher_id: Uuid, date: NaiveDate) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("meeting_bookings:{}:{}", teacher_id, date))
        .execute(conn)
        .await?;

    Ok(())
}

/// Confirmed bookings of the teacher that day which `range` would overlap.
async fn overlapping(
    conn: &mut PgConnection,
    range: &ConflictQuery,
) -> Result<Vec<MeetingBooking>> {
    let rows = sqlx::query_as::<_, DbMeetingBooking>(&format!(
        r#"
        {JOINED_SELECT}
        FROM meeting_bookings mb
        {JOINS}
        WHERE mb.teacher_id = $1 AND mb.meeting_date = $2 AND mb.status = 'confirmed'
        ORDER BY mb.start_time ASC
        "#
    ))
    .bind(range.teacher_id)
    .bind(range.meeting_date)
    .fetch_all(conn)
    .await?;

    let bookings: Vec<MeetingBooking> = convert_all(rows)?;
    Ok(bookings
        .into_iter()
        .filter(|booking| Some(booking.id) != range.exclude_booking_id)
        .filter(|booking| booking.conflicts_with(range.start_time, range.end_time))
        .collect())
}

pub struct PgMeetingBookingRepository {
    pool: DbPool,
}

impl PgMeetingBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeetingBookingRepository for PgMeetingBookingRepository {
    async fn create(&self, booking: NewMeetingBooking) -> Result<BookingWrite> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        lock_teacher_day(&mut tx, booking.teacher_id, booking.meeting_date).await?;

        let conflicts = overlapping(
            &mut tx,
            &ConflictQuery {
                teacher_id: booking.teacher_id,
                meeting_date: booking.meeting_date,
                start_time: booking.start_time,
                end_time: booking.end_time,
                exclude_booking_id: None,
            },
        )
        .await?;
        if !conflicts.is_empty() {
            tx.rollback().await?;
            return Ok(BookingWrite::Conflict(conflicts));
        }

        let row = sqlx::query_as::<_, DbMeetingBooking>(&format!(
            r#"
            WITH mb AS (
                INSERT INTO meeting_bookings (id, club_id, teacher_id, student_id, meeting_date,
                                              start_time, end_time, room_number, purpose, status,
                                              created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'confirmed', $10, $10)
                RETURNING *
            )
            {JOINED_SELECT}
            FROM mb
            {JOINS}
            "#
        ))
        .bind(id)
        .bind(booking.club_id)
        .bind(booking.teacher_id)
        .bind(&booking.student_id)
        .bind(booking.meeting_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(&booking.room_number)
        .bind(&booking.purpose)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(BookingWrite::Saved(MeetingBooking::try_from(row)?))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MeetingBooking>> {
        let row = sqlx::query_as::<_, DbMeetingBooking>(&format!(
            r#"
            {JOINED_SELECT}
            FROM meeting_bookings mb
            {JOINS}
            WHERE mb.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MeetingBooking::try_from).transpose()
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<MeetingBooking>> {
        let rows = sqlx::query_as::<_, DbMeetingBooking>(&format!(
            r#"
            {JOINED_SELECT}
            FROM meeting_bookings mb
            {JOINS}
            WHERE ($1::UUID IS NULL OR mb.teacher_id = $1)
              AND ($2::UUID IS NULL OR mb.club_id = $2)
              AND ($3::VARCHAR IS NULL OR mb.student_id = $3)
              AND ($4::VARCHAR IS NULL OR mb.status = $4)
              AND ($5::DATE IS NULL OR mb.meeting_date >= $5)
              AND ($6::DATE IS NULL OR mb.meeting_date <= $6)
            ORDER BY mb.meeting_date ASC, mb.start_time ASC
            "#
        ))
        .bind(filter.teacher_id)
        .bind(filter.club_id)
        .bind(filter.student_id)
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn find_conflicts(&self, query: ConflictQuery) -> Result<Vec<MeetingBooking>> {
        let rows = sqlx::query_as::<_, DbMeetingBooking>(&format!(
            r#"
            {JOINED_SELECT}
            FROM meeting_bookings mb
            {JOINS}
            WHERE mb.teacher_id = $1
              AND mb.meeting_date = $2
              AND mb.status = 'confirmed'
              AND mb.start_time < $4
              AND mb.end_time > $3
              AND ($5::UUID IS NULL OR mb.id <> $5)
            ORDER BY mb.start_time ASC
            "#
        ))
        .bind(query.teacher_id)
        .bind(query.meeting_date)
        .bind(query.start_time)
        .bind(query.end_time)
        .bind(query.exclude_booking_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<BookingWrite> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, DbMeetingBooking>(&format!(
            r#"
            {JOINED_SELECT}
            FROM meeting_bookings mb
            {JOINS}
            WHERE mb.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .map(MeetingBooking::try_from)
        .transpose()?;
        let Some(current) = current.filter(|booking| booking.status == from) else {
            return Ok(BookingWrite::Stale);
        };

        if to == BookingStatus::Confirmed {
            lock_teacher_day(&mut tx, current.teacher_id, current.meeting_date).await?;
            let conflicts = overlapping(
                &mut tx,
                &ConflictQuery {
                    teacher_id: current.teacher_id,
                    meeting_date: current.meeting_date,
                    start_time: current.start_time,
                    end_time: current.end_time,
                    exclude_booking_id: Some(id),
                },
            )
            .await?;
            if !conflicts.is_empty() {
                tx.rollback().await?;
                return Ok(BookingWrite::Conflict(conflicts));
            }
        }

        // Only applies while the booking is still in `from`
        let row = sqlx::query_as::<_, DbMeetingBooking>(&format!(
            r#"
            WITH mb AS (
                UPDATE meeting_bookings
                SET status = $3, updated_at = NOW()
                WHERE id = $1 AND status = $2
                RETURNING *
            )
            {JOINED_SELECT}
            FROM mb
            {JOINS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(BookingWrite::Stale);
        };
        tx.commit().await?;

        tracing::debug!("Booking {} moved from {} to {}", id, from, to);
        Ok(BookingWrite::Saved(MeetingBooking::try_from(row)?))
    }
}
