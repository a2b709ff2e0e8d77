use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::IdentityClaim;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [&'static str; 3] = ["pending", "in-progress", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
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
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status '{}'", other)),
        }
    }
}

/// Owner captured when the task is created; not re-synced on rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    pub user_id: Uuid,
    pub username: String,
}

impl From<&IdentityClaim> for OwnerRef {
    fn from(identity: &IdentityClaim) -> Self {
        Self {
            user_id: identity.subject,
            username: identity.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub due_date: Option<DateTime<Utc>>,
    pub user: OwnerRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(draft: NewTask, owner: OwnerRef) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            status: draft.status.unwrap_or_default(),
            due_date: draft.due_date,
            user: owner,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, subject: Uuid) -> bool {
        self.user.user_id == subject
    }

    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = Utc::now();
    }
}

/// Validated create payload. Owner-like fields never make it in here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub name: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Flat row shape of the `tasks` table
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = String;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            status: row.status.parse()?,
            due_date: row.due_date,
            user: OwnerRef {
                user_id: row.owner_id,
                username: row.owner_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerRef {
        OwnerRef {
            user_id: Uuid::new_v4(),
            username: "alice".into(),
        }
    }

    #[test]
    fn status_defaults_to_pending() {
        let draft = NewTask {
            name: "write report".into(),
            status: None,
            due_date: None,
        };
        let task = Task::new(draft, owner());
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn wire_shape_uses_camel_case_owner() {
        let owner = owner();
        let task = Task::new(
            NewTask {
                name: "x1".into(),
                status: Some(TaskStatus::InProgress),
                due_date: None,
            },
            owner.clone(),
        );
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["status"], "in-progress");
        assert_eq!(value["user"]["userId"], serde_json::json!(owner.user_id));
        assert_eq!(value["user"]["username"], "alice");
        assert!(value.get("dueDate").is_none());
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            name: "x1".into(),
            status: "done".into(),
            due_date: None,
            owner_id: Uuid::new_v4(),
            owner_username: "bob".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Task::try_from(row).is_err());
    }
}
