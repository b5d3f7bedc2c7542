pub mod advisor_request;
pub mod availability;
pub mod club;
pub mod meeting_booking;
pub mod notification;
pub mod task;
pub mod teacher;

use serde::{Deserialize, Serialize};

/// Body returned by endpoints that only acknowledge an action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returns the trimmed value when it is present and non-blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
