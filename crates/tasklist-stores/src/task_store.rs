//! TaskStore in-memory implementation.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use tasklist_core::store::{StoreError, TaskStore};
use tasklist_core::types::{NewTask, Task, TaskId, TaskPatch, TaskScope};

const DEFAULT_IN_MEMORY_TASK_LIMIT: usize = 5_000;

/// In-memory implementation for development and testing.
///
/// Ids are assigned from a monotonic counter, so id order is insertion order.
pub struct InMemoryTaskStore {
    tasks: RwLock<BTreeMap<TaskId, Task>>,
    next_id: RwLock<TaskId>,
    max_tasks: usize,
}

impl InMemoryTaskStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self::with_max_tasks(DEFAULT_IN_MEMORY_TASK_LIMIT)
    }

    /// Create a new in-memory store with a hard capacity limit.
    pub fn with_max_tasks(max_tasks: usize) -> Self {
        Self {
            tasks: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(0),
            max_tasks: max_tasks.max(1),
        }
    }

    /// Number of rows across all owners.
    pub fn len(&self) -> usize {
        self.tasks.read().map(|tasks| tasks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn select_for_user(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        let tasks = self
            .tasks
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        // BTreeMap iteration is already id-ascending.
        Ok(tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        if tasks.len() >= self.max_tasks {
            return Err(StoreError::Remote {
                code: Some("54000".to_string()),
                message: "task limit reached".to_string(),
                details: Some(format!("store holds at most {} rows", self.max_tasks)),
                hint: None,
            });
        }
        let mut next_id = self
            .next_id
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        *next_id += 1;
        let row = Task {
            id: *next_id,
            title: task.title.clone(),
            completed: task.completed,
            user_id: task.user_id.clone(),
        };
        tasks.insert(row.id, row.clone());
        Ok(vec![row])
    }

    async fn update(&self, scope: &TaskScope, patch: &TaskPatch) -> Result<u64, StoreError> {
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        match tasks.get_mut(&scope.id).filter(|t| scope.matches(t)) {
            Some(task) => {
                patch.apply_to(task);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, scope: &TaskScope) -> Result<u64, StoreError> {
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let owned = tasks.get(&scope.id).is_some_and(|t| scope.matches(t));
        if owned {
            tasks.remove(&scope.id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str, user_id: &str) -> NewTask {
        NewTask::new(title, user_id).unwrap()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        tokio_test::block_on(async {
            let store = InMemoryTaskStore::new();
            let a = store.insert(&new_task("a", "u-1")).await.unwrap();
            let b = store.insert(&new_task("b", "u-2")).await.unwrap();
            assert_eq!(a[0].id, 1);
            assert_eq!(b[0].id, 2);
            assert!(!a[0].completed);
        });
    }

    #[test]
    fn test_select_filters_by_owner_in_id_order() {
        tokio_test::block_on(async {
            let store = InMemoryTaskStore::new();
            for (title, owner) in [("a", "u-1"), ("b", "u-2"), ("c", "u-1")] {
                store.insert(&new_task(title, owner)).await.unwrap();
            }
            let rows = store.select_for_user("u-1").await.unwrap();
            let titles: Vec<&str> = rows.iter().map(|t| t.title.as_str()).collect();
            assert_eq!(titles, vec!["a", "c"]);
        });
    }

    #[test]
    fn test_scoped_mutations_ignore_foreign_rows() {
        tokio_test::block_on(async {
            let store = InMemoryTaskStore::new();
            let row = store.insert(&new_task("mine", "u-1")).await.unwrap().remove(0);

            let foreign = TaskScope::new(row.id, "u-2");
            assert_eq!(
                store
                    .update(&foreign, &TaskPatch::Completed(true))
                    .await
                    .unwrap(),
                0
            );
            assert_eq!(store.delete(&foreign).await.unwrap(), 0);

            let own = row.scope();
            assert_eq!(
                store
                    .update(&own, &TaskPatch::Title("renamed".to_string()))
                    .await
                    .unwrap(),
                1
            );
            let rows = store.select_for_user("u-1").await.unwrap();
            assert_eq!(rows[0].title, "renamed");
            assert_eq!(store.delete(&own).await.unwrap(), 1);
            assert!(store.is_empty());
        });
    }

    #[test]
    fn test_in_memory_task_store_limit() {
        tokio_test::block_on(async {
            let store = InMemoryTaskStore::with_max_tasks(2);
            store.insert(&new_task("a", "u-1")).await.unwrap();
            store.insert(&new_task("b", "u-1")).await.unwrap();
            let err = store.insert(&new_task("c", "u-1")).await.unwrap_err();
            assert!(matches!(err, StoreError::Remote { .. }));
            assert_eq!(store.len(), 2);
        });
    }
}
