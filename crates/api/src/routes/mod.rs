pub mod advisor_requests;
pub mod availability;
pub mod clubs;
pub mod health;
pub mod meeting_bookings;
pub mod notifications;
pub mod tasks;
pub mod teachers;
