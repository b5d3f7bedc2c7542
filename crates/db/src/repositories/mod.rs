//! Repository traits and their Postgres implementations.
//!
//! Handlers only see the traits, so the same handler code runs against
//! Postgres in production and against the mocks in [`crate::mock`] in tests.
//! Arguments are owned so the traits stay object safe and mockable.

pub mod advisor_request;
pub mod availability;
pub mod club;
pub mod meeting_booking;
pub mod notification;
pub mod task;
pub mod teacher;

use async_trait::async_trait;
use clubly_core::models::{
    advisor_request::{AdvisorRequest, AdvisorRequestFilter, AdvisorRequestStatus, NewAdvisorRequest},
    availability::{AvailabilitySlot, TeacherAvailability},
    club::{Club, NewClub},
    meeting_booking::{
        BookingFilter, BookingStatus, BookingWrite, ConflictQuery, MeetingBooking, NewMeetingBooking,
    },
    notification::{NewNotification, Notification, NotificationFilter},
    task::{NewTask, Task, TaskChanges},
    teacher::{NewTeacher, Teacher, TeacherChanges, TeacherFilter},
};
use eyre::Result;
use uuid::Uuid;

pub use advisor_request::PgAdvisorRequestRepository;
pub use availability::PgAvailabilityRepository;
pub use club::PgClubRepository;
pub use meeting_booking::PgMeetingBookingRepository;
pub use notification::PgNotificationRepository;
pub use task::PgTaskRepository;
pub use teacher::PgTeacherRepository;

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    /// Inserts a teacher; `None` when the `user_id` is already registered.
    async fn create(&self, teacher: NewTeacher) -> Result<Option<Teacher>>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Teacher>>;

    async fn get_by_user_id(&self, user_id: String) -> Result<Option<Teacher>>;

    async fn list(&self, filter: TeacherFilter) -> Result<Vec<Teacher>>;

    async fn update_by_user_id(
        &self,
        user_id: String,
        changes: TeacherChanges,
    ) -> Result<Option<Teacher>>;

    /// Increments the club count if the teacher is below capacity.
    /// Returns `false` when the teacher is full or missing.
    async fn reserve_club_slot(&self, id: Uuid) -> Result<bool>;

    /// Decrements the club count, never below zero.
    async fn release_club_slot(&self, id: Uuid) -> Result<()>;

    async fn set_club_count(&self, id: Uuid, count: i32) -> Result<()>;
}

#[async_trait]
pub trait ClubRepository: Send + Sync {
    async fn create(&self, club: NewClub) -> Result<Club>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Club>>;
}

#[async_trait]
pub trait AdvisorRequestRepository: Send + Sync {
    /// A pending or approved request for the same club, teacher and student.
    async fn find_live(
        &self,
        club_id: Uuid,
        teacher_id: Uuid,
        student_id: String,
    ) -> Result<Option<AdvisorRequest>>;

    /// Inserts a pending request; `None` when a live duplicate already exists.
    async fn create(&self, request: NewAdvisorRequest) -> Result<Option<AdvisorRequest>>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AdvisorRequest>>;

    async fn list(&self, filter: AdvisorRequestFilter) -> Result<Vec<AdvisorRequest>>;

    /// Moves a request from `from` to `to`; `None` if it is no longer in `from`.
    async fn transition(
        &self,
        id: Uuid,
        from: AdvisorRequestStatus,
        to: AdvisorRequestStatus,
    ) -> Result<Option<AdvisorRequest>>;

    /// Number of approved requests per teacher id.
    async fn approved_counts(&self) -> Result<Vec<(Uuid, i64)>>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Active slots ordered by day, then start time.
    async fn list_active(&self, teacher_id: Uuid) -> Result<Vec<TeacherAvailability>>;

    async fn list_active_for_teachers(
        &self,
        teacher_ids: Vec<Uuid>,
    ) -> Result<Vec<TeacherAvailability>>;

    /// Deletes every slot of the teacher and inserts `slots` in their place.
    async fn replace(
        &self,
        teacher_id: Uuid,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<TeacherAvailability>>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<TeacherAvailability>>;

    async fn update(&self, slot: TeacherAvailability) -> Result<Option<TeacherAvailability>>;

    /// Returns whether a slot was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> Result<Notification>;

    /// Newest first, paginated.
    async fn list(&self, filter: NotificationFilter) -> Result<Vec<Notification>>;

    async fn count_unread(&self, user_id: String) -> Result<i64>;

    /// Marks the given notifications, or every unread one when `ids` is
    /// `None`, as read. Returns the number of rows changed.
    async fn mark_read(&self, user_id: String, ids: Option<Vec<Uuid>>) -> Result<u64>;

    /// Deletes one notification, or every read one when `id` is `None`.
    async fn delete(&self, user_id: String, id: Option<Uuid>) -> Result<u64>;
}

#[async_trait]
pub trait MeetingBookingRepository: Send + Sync {
    /// Inserts a confirmed booking unless it overlaps another confirmed
    /// booking of the same teacher. Check and insert are atomic.
    async fn create(&self, booking: NewMeetingBooking) -> Result<BookingWrite>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MeetingBooking>>;

    /// Ordered by meeting date, then start time.
    async fn list(&self, filter: BookingFilter) -> Result<Vec<MeetingBooking>>;

    /// Confirmed bookings that overlap the queried range.
    async fn find_conflicts(&self, query: ConflictQuery) -> Result<Vec<MeetingBooking>>;

    /// Moves a booking from `from` to `to`. Confirming re-runs the overlap
    /// check atomically; a booking no longer in `from` yields `Stale`.
    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<BookingWrite>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Tasks of one club, oldest first.
    async fn list(&self, club_id: Uuid) -> Result<Vec<Task>>;

    /// `None` when no task with that id belongs to the club.
    async fn update(&self, club_id: Uuid, id: Uuid, changes: TaskChanges) -> Result<Option<Task>>;

    async fn delete(&self, club_id: Uuid, id: Uuid) -> Result<bool>;
}
