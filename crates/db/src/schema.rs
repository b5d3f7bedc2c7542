use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_teachers_user_id ON teachers(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_advisor_requests_teacher_id ON advisor_requests(teacher_id)",
    "CREATE INDEX IF NOT EXISTS idx_advisor_requests_club_id ON advisor_requests(club_id)",
    "CREATE INDEX IF NOT EXISTS idx_advisor_requests_student_id ON advisor_requests(student_id)",
    // One live request per club, teacher and student
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_advisor_requests_live
    ON advisor_requests(club_id, teacher_id, student_id)
    WHERE status IN ('pending', 'approved')
    "#,
    "CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_teacher_availability_teacher_id ON teacher_availability(teacher_id)",
    "CREATE INDEX IF NOT EXISTS idx_meeting_bookings_teacher_date ON meeting_bookings(teacher_id, meeting_date)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_club_id ON tasks(club_id, created_at)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create teachers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id UUID PRIMARY KEY,
            user_id VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            school_email VARCHAR(255) NULL,
            room_number VARCHAR(64) NULL,
            max_clubs INTEGER NOT NULL DEFAULT 3 CHECK (max_clubs >= 1),
            current_clubs_count INTEGER NOT NULL DEFAULT 0 CHECK (current_clubs_count >= 0),
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create clubs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clubs (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            owner_id VARCHAR(255) NOT NULL,
            description TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create advisor_requests table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS advisor_requests (
            id UUID PRIMARY KEY,
            club_id UUID NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
            teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            student_id VARCHAR(255) NOT NULL,
            message TEXT NULL,
            proposed_day SMALLINT NULL CHECK (proposed_day BETWEEN 0 AND 6),
            proposed_time TIME NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'denied', 'closed')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create notifications table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY,
            user_id VARCHAR(255) NOT NULL,
            type VARCHAR(32) NOT NULL,
            title VARCHAR(255) NOT NULL,
            message TEXT NOT NULL,
            related_id UUID NULL,
            read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create teacher_availability table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teacher_availability (
            id UUID PRIMARY KEY,
            teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            room_number VARCHAR(64) NULL,
            is_recurring BOOLEAN NOT NULL DEFAULT TRUE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_availability_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create meeting_bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meeting_bookings (
            id UUID PRIMARY KEY,
            club_id UUID NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
            teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            student_id VARCHAR(255) NOT NULL,
            meeting_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            room_number VARCHAR(64) NULL,
            purpose TEXT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed'
                CHECK (status IN ('confirmed', 'cancelled', 'completed')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create tasks table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id UUID PRIMARY KEY,
            club_id UUID NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'todo'
                CHECK (status IN ('todo', 'in_progress', 'completed')),
            priority VARCHAR(8) NOT NULL DEFAULT 'medium'
                CHECK (priority IN ('low', 'medium', 'high')),
            due_date DATE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in INDEXES {
        sqlx::query(*statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
