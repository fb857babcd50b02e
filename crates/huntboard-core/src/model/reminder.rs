use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dated to-do attached to one application. Cascade-deleted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub title: String,
    pub due_at: DateTime<Utc>,
}

impl ReminderDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, due_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            due_at,
        }
    }
}
