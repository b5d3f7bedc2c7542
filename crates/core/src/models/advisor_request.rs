//! Advisor requests: a student asking a teacher to advise a club.
//!
//! ## Lifecycle
//!
//! ```text
//! pending ──► approved ──► closed
//!    │
//!    └──────► denied
//! ```
//!
//! Every request starts `pending`. A teacher approves or denies it; an
//! approved request can later be closed by the student who made it. No
//! transition goes backwards and none re-enters its own state.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::wall_clock_opt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorRequestStatus {
    Pending,
    Approved,
    Denied,
    Closed,
}

impl AdvisorRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisorRequestStatus::Pending => "pending",
            AdvisorRequestStatus::Approved => "approved",
            AdvisorRequestStatus::Denied => "denied",
            AdvisorRequestStatus::Closed => "closed",
        }
    }

    pub fn can_transition_to(&self, next: AdvisorRequestStatus) -> bool {
        use AdvisorRequestStatus::*;

        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Denied) | (Approved, Closed)
        )
    }

    /// Statuses a teacher may set through a decision.
    pub fn is_decision(&self) -> bool {
        matches!(
            self,
            AdvisorRequestStatus::Approved | AdvisorRequestStatus::Denied
        )
    }
}

impl fmt::Display for AdvisorRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvisorRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdvisorRequestStatus::Pending),
            "approved" => Ok(AdvisorRequestStatus::Approved),
            "denied" => Ok(AdvisorRequestStatus::Denied),
            "closed" => Ok(AdvisorRequestStatus::Closed),
            other => Err(format!("Unknown advisor request status: {}", other)),
        }
    }
}

/// An advisor request joined with the names clients display next to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorRequest {
    pub id: Uuid,
    pub club_id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: String,
    pub message: Option<String>,
    pub proposed_day: Option<i16>,
    #[serde(default, with = "wall_clock_opt")]
    pub proposed_time: Option<NaiveTime>,
    pub status: AdvisorRequestStatus,
    pub club_name: Option<String>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequestsResponse {
    pub requests: Vec<AdvisorRequest>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAdvisorRequest {
    pub club_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub student_id: Option<String>,
    pub message: Option<String>,
    pub proposed_day: Option<i16>,
    #[serde(default, with = "wall_clock_opt")]
    pub proposed_time: Option<NaiveTime>,
}

/// Validated creation payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdvisorRequest {
    pub club_id: Uuid,
    pub teacher_id: Uuid,
    pub student_id: String,
    pub message: Option<String>,
    pub proposed_day: Option<i16>,
    pub proposed_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdvisorRequestStatus {
    pub request_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseAdvisorRequest {
    pub request_id: Option<Uuid>,
    pub student_id: Option<String>,
}

/// Filters for listing advisor requests; every field narrows the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvisorRequestFilter {
    pub teacher_id: Option<Uuid>,
    pub club_id: Option<Uuid>,
    pub student_id: Option<String>,
    pub status: Option<AdvisorRequestStatus>,
}
