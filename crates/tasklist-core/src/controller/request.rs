//! Remote round-trips issued by the task list controller

use tracing::debug;

use crate::store::{StoreError, TaskStore};
use crate::types::{NewTask, Task, TaskPatch, TaskScope, UserId};

/// A single remote call against the task table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    Load { user_id: UserId },
    Insert(NewTask),
    Update { scope: TaskScope, patch: TaskPatch },
    Delete { scope: TaskScope },
}

impl TaskRequest {
    /// Operation name used in diagnostics
    pub fn operation(&self) -> &'static str {
        match self {
            TaskRequest::Load { .. } => "load tasks",
            TaskRequest::Insert(_) => "add task",
            TaskRequest::Update {
                patch: TaskPatch::Title(_),
                ..
            } => "update task",
            TaskRequest::Update {
                patch: TaskPatch::Completed(_),
                ..
            } => "toggle task",
            TaskRequest::Delete { .. } => "delete task",
        }
    }

    /// Issue the request and pair the outcome with it.
    pub async fn execute(self, store: &dyn TaskStore) -> Completion {
        debug!(operation = self.operation(), "issuing task request");
        let result = match &self {
            TaskRequest::Load { user_id } => store
                .select_for_user(user_id)
                .await
                .map(TaskResponse::Loaded),
            TaskRequest::Insert(task) => store.insert(task).await.map(TaskResponse::Inserted),
            TaskRequest::Update { scope, patch } => {
                store.update(scope, patch).await.map(TaskResponse::Updated)
            }
            TaskRequest::Delete { scope } => store.delete(scope).await.map(TaskResponse::Deleted),
        };
        Completion {
            request: self,
            result,
        }
    }
}

/// Successful store answer for a [`TaskRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResponse {
    Loaded(Vec<Task>),
    Inserted(Vec<Task>),
    /// Rows affected
    Updated(u64),
    /// Rows affected
    Deleted(u64),
}

/// A finished round-trip, ready to be reconciled into local state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request: TaskRequest,
    pub result: Result<TaskResponse, StoreError>,
}
