//! Task type definitions
//!
//! A Task is a row of the remote task table. Its id is assigned by the store;
//! the client never generates one.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Type alias for the store-assigned task id
pub type TaskId = i64;

/// A single to-do item belonging to one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Owning identity; set at creation, never mutated
    pub user_id: UserId,
}

impl Task {
    pub fn scope(&self) -> TaskScope {
        TaskScope::new(self.id, self.user_id.clone())
    }
}

/// Insert payload for a new task.
///
/// Only constructible with a non-empty trimmed title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub user_id: UserId,
    pub completed: bool,
}

impl NewTask {
    /// Returns `None` when the trimmed title is empty.
    pub fn new(title: &str, user_id: impl Into<UserId>) -> Option<Self> {
        let title = normalize_title(title)?;
        Some(Self {
            title,
            user_id: user_id.into(),
            completed: false,
        })
    }
}

/// Row filter carried by every update and delete: primary id AND owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskScope {
    pub id: TaskId,
    pub user_id: UserId,
}

impl TaskScope {
    pub fn new(id: TaskId, user_id: impl Into<UserId>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        task.id == self.id && task.user_id == self.user_id
    }
}

/// Field-scoped update applied to a single task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPatch {
    Title(String),
    Completed(bool),
}

impl TaskPatch {
    pub fn column(&self) -> &'static str {
        match self {
            TaskPatch::Title(_) => "title",
            TaskPatch::Completed(_) => "completed",
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        match self {
            TaskPatch::Title(title) => task.title = title.clone(),
            TaskPatch::Completed(completed) => task.completed = *completed,
        }
    }
}

/// Trimmed title, or `None` when nothing remains.
pub(crate) fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
