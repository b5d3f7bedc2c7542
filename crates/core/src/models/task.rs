//! Club task tracking: a to-do list kept per club.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::non_blank;
use crate::errors::{ClubError, ClubResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("Invalid task status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("Invalid task priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
    pub total: usize,
}

/// Task fields as sent by clients. Every field is optional so creation and
/// partial updates share one shape; status and priority arrive as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskInput {
    fn parsed_status(&self) -> ClubResult<Option<TaskStatus>> {
        non_blank(&self.status)
            .map(|status| status.parse().map_err(ClubError::Validation))
            .transpose()
    }

    fn parsed_priority(&self) -> ClubResult<Option<TaskPriority>> {
        non_blank(&self.priority)
            .map(|priority| priority.parse().map_err(ClubError::Validation))
            .transpose()
    }

    /// A new task needs a title; status defaults to todo and priority to
    /// medium.
    pub fn into_new_task(self, club_id: Uuid) -> ClubResult<NewTask> {
        let title = non_blank(&self.title)
            .ok_or_else(|| ClubError::required("task.title"))?
            .to_string();

        Ok(NewTask {
            club_id,
            title,
            description: non_blank(&self.description).map(str::to_string),
            status: self.parsed_status()?.unwrap_or_default(),
            priority: self.parsed_priority()?.unwrap_or_default(),
            due_date: self.due_date,
        })
    }

    /// Fields left out keep their stored value. A blank title is rejected.
    pub fn into_changes(self) -> ClubResult<TaskChanges> {
        if self.title.is_some() && non_blank(&self.title).is_none() {
            return Err(ClubError::Validation("task.title cannot be blank".to_string()));
        }

        Ok(TaskChanges {
            title: non_blank(&self.title).map(str::to_string),
            description: non_blank(&self.description).map(str::to_string),
            status: self.parsed_status()?,
            priority: self.parsed_priority()?,
            due_date: self.due_date,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub club_id: Option<Uuid>,
    pub task: Option<TaskInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub club_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub task: Option<TaskInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub club_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}
