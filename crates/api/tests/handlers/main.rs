mod test_utils;

mod availability_test;
mod health_test;
mod meeting_bookings_test;
mod notifications_test;
mod tasks_test;
