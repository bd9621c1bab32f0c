use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Pagination, Result};

/// A task as returned by the listing query: joined organisation and operator
/// snapshots plus the task's non-cancelled shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub ops: Option<Ops>,
    pub organisation: Option<Organisation>,
    pub shifts: Vec<Shift>,
}

/// One page of the task listing, as sent to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub pagination: Pagination,
    pub tasks: Vec<Task>,
}

/// Operator currently assigned to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ops {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub picture_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub slots: Slots,
    pub applicants: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slots {
    pub filled: u16,
    pub total: u16,
}

/// Payload of a task assignment: the new assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default)]
    pub assignee_id: String,
}

impl TaskUpdate {
    pub fn new(assignee_id: impl Into<String>) -> Self {
        Self {
            assignee_id: assignee_id.into(),
        }
    }

    /// Presence check only; the assignee is not looked up.
    pub fn validate(&self) -> Result<()> {
        if self.assignee_id.is_empty() {
            return Err(Error::InvalidUpdate("empty assignee ID".to_string()));
        }
        Ok(())
    }
}
