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
use mockall::mock;
use uuid::Uuid;

use crate::repositories::{
    AdvisorRequestRepository, AvailabilityRepository, ClubRepository, MeetingBookingRepository,
    NotificationRepository, TaskRepository, TeacherRepository,
};

mock! {
    pub TeacherRepo {}

    #[async_trait]
    impl TeacherRepository for TeacherRepo {
        async fn create(&self, teacher: NewTeacher) -> eyre::Result<Option<Teacher>>;
        async fn get_by_id(&self, id: Uuid) -> eyre::Result<Option<Teacher>>;
        async fn get_by_user_id(&self, user_id: String) -> eyre::Result<Option<Teacher>>;
        async fn list(&self, filter: TeacherFilter) -> eyre::Result<Vec<Teacher>>;
        async fn update_by_user_id(
            &self,
            user_id: String,
            changes: TeacherChanges,
        ) -> eyre::Result<Option<Teacher>>;
        async fn reserve_club_slot(&self, id: Uuid) -> eyre::Result<bool>;
        async fn release_club_slot(&self, id: Uuid) -> eyre::Result<()>;
        async fn set_club_count(&self, id: Uuid, count: i32) -> eyre::Result<()>;
    }
}

mock! {
    pub ClubRepo {}

    #[async_trait]
    impl ClubRepository for ClubRepo {
        async fn create(&self, club: NewClub) -> eyre::Result<Club>;
        async fn get_by_id(&self, id: Uuid) -> eyre::Result<Option<Club>>;
    }
}

mock! {
    pub AdvisorRequestRepo {}

    #[async_trait]
    impl AdvisorRequestRepository for AdvisorRequestRepo {
        async fn find_live(
            &self,
            club_id: Uuid,
            teacher_id: Uuid,
            student_id: String,
        ) -> eyre::Result<Option<AdvisorRequest>>;
        async fn create(&self, request: NewAdvisorRequest) -> eyre::Result<Option<AdvisorRequest>>;
        async fn get_by_id(&self, id: Uuid) -> eyre::Result<Option<AdvisorRequest>>;
        async fn list(&self, filter: AdvisorRequestFilter) -> eyre::Result<Vec<AdvisorRequest>>;
        async fn transition(
            &self,
            id: Uuid,
            from: AdvisorRequestStatus,
            to: AdvisorRequestStatus,
        ) -> eyre::Result<Option<AdvisorRequest>>;
        async fn approved_counts(&self) -> eyre::Result<Vec<(Uuid, i64)>>;
    }
}

mock! {
    pub AvailabilityRepo {}

    #[async_trait]
    impl AvailabilityRepository for AvailabilityRepo {
        async fn list_active(&self, teacher_id: Uuid) -> eyre::Result<Vec<TeacherAvailability>>;
        async fn list_active_for_teachers(
            &self,
            teacher_ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<TeacherAvailability>>;
        async fn replace(
            &self,
            teacher_id: Uuid,
            slots: Vec<AvailabilitySlot>,
        ) -> eyre::Result<Vec<TeacherAvailability>>;
        async fn get_by_id(&self, id: Uuid) -> eyre::Result<Option<TeacherAvailability>>;
        async fn update(&self, slot: TeacherAvailability) -> eyre::Result<Option<TeacherAvailability>>;
        async fn delete(&self, id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub NotificationRepo {}

    #[async_trait]
    impl NotificationRepository for NotificationRepo {
        async fn create(&self, notification: NewNotification) -> eyre::Result<Notification>;
        async fn list(&self, filter: NotificationFilter) -> eyre::Result<Vec<Notification>>;
        async fn count_unread(&self, user_id: String) -> eyre::Result<i64>;
        async fn mark_read(&self, user_id: String, ids: Option<Vec<Uuid>>) -> eyre::Result<u64>;
        async fn delete(&self, user_id: String, id: Option<Uuid>) -> eyre::Result<u64>;
    }
}

mock! {
    pub MeetingBookingRepo {}

    #[async_trait]
    impl MeetingBookingRepository for MeetingBookingRepo {
        async fn create(&self, booking: NewMeetingBooking) -> eyre::Result<BookingWrite>;
        async fn get_by_id(&self, id: Uuid) -> eyre::Result<Option<MeetingBooking>>;
        async fn list(&self, filter: BookingFilter) -> eyre::Result<Vec<MeetingBooking>>;
        async fn find_conflicts(&self, query: ConflictQuery) -> eyre::Result<Vec<MeetingBooking>>;
        async fn update_status(
            &self,
            id: Uuid,
            from: BookingStatus,
            to: BookingStatus,
        ) -> eyre::Result<BookingWrite>;
    }
}

mock! {
    pub TaskRepo {}

    #[async_trait]
    impl TaskRepository for TaskRepo {
        async fn create(&self, task: NewTask) -> eyre::Result<Task>;
        async fn list(&self, club_id: Uuid) -> eyre::Result<Vec<Task>>;
        async fn update(
            &self,
            club_id: Uuid,
            id: Uuid,
            changes: TaskChanges,
        ) -> eyre::Result<Option<Task>>;
        async fn delete(&self, club_id: Uuid, id: Uuid) -> eyre::Result<bool>;
    }
}
