//! Core types for the task manager service.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Status assigned when a create request omits one.
pub const STATUS_PENDING: &str = "pending";

/// The only status that carries a finish time.
pub const STATUS_COMPLETED: &str = "completed";

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
    pub finish_at: Option<String>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// A validated create request with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: String,
}

impl CreateTaskRequest {
    /// Reject a missing or empty title, then fill in the defaults.
    pub fn validate(self) -> Result<NewTask, ApiError> {
        let title = require_non_empty(self.title, "title")?;
        Ok(NewTask {
            title,
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_else(|| STATUS_PENDING.to_string()),
        })
    }
}

/// Body of `PUT /tasks/{id}`. Every field is written wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Fields written by an update, exactly as the client sent them.
///
/// `None` is written as NULL. The store rejects a NULL `title` or `status`
/// only when the row exists, so an unknown id reports not found first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl TaskChanges {
    /// First NOT NULL field the update leaves empty.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.is_none() {
            Some("title")
        } else if self.status.is_none() {
            Some("status")
        } else {
            None
        }
    }
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
        }
    }
}

fn require_non_empty(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::missing_field(field)),
    }
}

/// Acknowledgment body for update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Finish time written alongside `status` on update.
///
/// A completed status is stamped with `now`; any other status clears it.
pub fn finish_at_for(status: &str, now: &str) -> Option<String> {
    (status == STATUS_COMPLETED).then(|| now.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn create_applies_defaults() {
        let req = CreateTaskRequest {
            title: Some("Buy milk".into()),
            ..Default::default()
        };
        let task = req.validate().unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert_eq!(task.status, STATUS_PENDING);
    }

    #[test]
    fn create_keeps_supplied_fields() {
        let req = CreateTaskRequest {
            title: Some("Ship".into()),
            description: Some("v1".into()),
            status: Some("in_progress".into()),
        };
        let task = req.validate().unwrap();
        assert_eq!(task.description, "v1");
        assert_eq!(task.status, "in_progress");
    }

    #[test]
    fn create_rejects_missing_or_empty_title() {
        let err = CreateTaskRequest::default().validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(err.message, "title is required");

        let err = CreateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("title"));
    }

    #[test]
    fn update_keeps_fields_as_sent() {
        let changes = TaskChanges::from(UpdateTaskRequest {
            title: Some(String::new()),
            description: None,
            status: Some("pending".into()),
        });
        assert_eq!(changes.title.as_deref(), Some(""));
        assert_eq!(changes.description, None);
        assert_eq!(changes.missing_field(), None);
    }

    #[test]
    fn missing_field_names_title_before_status() {
        assert_eq!(TaskChanges::default().missing_field(), Some("title"));

        let changes = TaskChanges {
            title: Some("t".into()),
            ..Default::default()
        };
        assert_eq!(changes.missing_field(), Some("status"));
    }

    #[test]
    fn finish_at_only_for_completed() {
        let now = "2026-01-01T10:00:00.000+08:00";
        assert_eq!(finish_at_for("completed", now), Some(now.to_string()));
        assert_eq!(finish_at_for("pending", now), None);
        assert_eq!(finish_at_for("Completed", now), None);
    }

    #[test]
    fn task_serializes_null_finish_at() {
        let task = Task {
            id: 1,
            title: "Buy milk".into(),
            description: Some(String::new()),
            status: STATUS_PENDING.into(),
            created_at: "2026-01-01T10:00:00.000+08:00".into(),
            finish_at: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json["finish_at"].is_null());
        assert_eq!(json["description"], "");
    }
}
