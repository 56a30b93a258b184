//! TaskStore - remote task table trait

use std::sync::Arc;

use async_trait::async_trait;

use super::StoreError;
use crate::types::{NewTask, Task, TaskPatch, TaskScope};

/// TaskStore trait - async interface to the task table.
///
/// Updates and deletes are always constrained by [`TaskScope`], so a scope
/// naming another identity's task affects zero rows.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `user_id`, ordered by id ascending
    async fn select_for_user(&self, user_id: &str) -> Result<Vec<Task>, StoreError>;

    /// Insert a row and return the store-generated record(s)
    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError>;

    /// Apply a single-field patch; returns rows affected
    async fn update(&self, scope: &TaskScope, patch: &TaskPatch) -> Result<u64, StoreError>;

    /// Delete the scoped row; returns rows affected
    async fn delete(&self, scope: &TaskScope) -> Result<u64, StoreError>;
}

#[async_trait]
impl TaskStore for Arc<dyn TaskStore> {
    async fn select_for_user(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        (**self).select_for_user(user_id).await
    }

    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError> {
        (**self).insert(task).await
    }

    async fn update(&self, scope: &TaskScope, patch: &TaskPatch) -> Result<u64, StoreError> {
        (**self).update(scope, patch).await
    }

    async fn delete(&self, scope: &TaskScope) -> Result<u64, StoreError> {
        (**self).delete(scope).await
    }
}
