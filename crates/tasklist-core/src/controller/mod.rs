//! Task list controller
//!
//! Owns the ordered task list of the current identity and mediates every
//! mutation against the task store. Each operation is split in two
//! synchronous halves around the remote call:
//!
//! 1. `request_*` validates against local state and yields a [`TaskRequest`]
//!    (`None` means no-op: nothing is sent).
//! 2. [`TaskListController::apply`] reconciles the [`Completion`] once the
//!    store answers.
//!
//! Completions are applied in arrival order. Add, edit, toggle and delete only
//! touch local state after the store confirms; reorder is purely local and is
//! never sent to the store.

mod reorder;
mod request;

pub use reorder::{move_by_key, move_item};
pub use request::{Completion, TaskRequest, TaskResponse};

use tracing::{debug, error, warn};

use crate::session::{GateDecision, Route, SessionGate};
use crate::store::{StoreError, TaskStore};
use crate::types::{normalize_title, Identity, NewTask, Task, TaskId, TaskPatch, TaskScope};

/// An in-progress inline edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub task_id: TaskId,
    pub buffer: String,
}

/// Outcome of an async convenience call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Validation failed locally; no remote call was issued
    Skipped,
    Applied(TaskResponse),
    Failed(StoreError),
}

impl Dispatch {
    pub fn is_applied(&self) -> bool {
        matches!(self, Dispatch::Applied(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskListController {
    identity: Option<Identity>,
    tasks: Vec<Task>,
    new_task: String,
    editing: Option<EditState>,
}

impl TaskListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn new_task(&self) -> &str {
        &self.new_task
    }

    pub fn set_new_task(&mut self, text: impl Into<String>) {
        self.new_task = text.into();
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    /// Replace the edit buffer. Returns `false` when no edit is open.
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) -> bool {
        match self.editing.as_mut() {
            Some(edit) => {
                edit.buffer = text.into();
                true
            }
            None => false,
        }
    }

    /// Switch identity. Any state of a previous identity is discarded.
    pub fn set_identity(&mut self, identity: Option<Identity>) {
        let changed = self.identity.as_ref().map(|i| &i.id) != identity.as_ref().map(|i| &i.id);
        if changed {
            self.reset();
        }
        self.identity = identity;
    }

    fn reset(&mut self) {
        self.identity = None;
        self.tasks.clear();
        self.new_task.clear();
        self.editing = None;
    }

    /// Resolve the identity and load its tasks. Redirects without fetching
    /// when no identity resolves.
    pub async fn mount(&mut self, gate: &SessionGate, store: &dyn TaskStore) -> Route {
        match gate.resolve().await {
            GateDecision::Proceed(identity) => {
                self.set_identity(Some(identity));
                self.load(store).await;
                Route::Tasks
            }
            GateDecision::Redirect(route) => {
                self.reset();
                route
            }
        }
    }

    pub async fn sign_out(&mut self, gate: &SessionGate) -> Route {
        let route = gate.sign_out().await;
        self.reset();
        route
    }

    pub fn request_load(&self) -> Option<TaskRequest> {
        let identity = self.identity.as_ref()?;
        Some(TaskRequest::Load {
            user_id: identity.id.clone(),
        })
    }

    pub fn request_add(&self, title: &str) -> Option<TaskRequest> {
        let identity = self.identity.as_ref()?;
        NewTask::new(title, identity.id.clone()).map(TaskRequest::Insert)
    }

    /// Add from the pending new-task buffer.
    pub fn request_add_pending(&self) -> Option<TaskRequest> {
        self.request_add(&self.new_task)
    }

    /// Enter edit mode for `id`, seeding the buffer with its current title.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.task(id) else {
            return false;
        };
        self.editing = Some(EditState {
            task_id: id,
            buffer: task.title.clone(),
        });
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn request_save_edit(&self, id: TaskId) -> Option<TaskRequest> {
        let identity = self.identity.as_ref()?;
        let edit = self.editing.as_ref().filter(|edit| edit.task_id == id)?;
        let title = normalize_title(&edit.buffer)?;
        Some(TaskRequest::Update {
            scope: TaskScope::new(id, identity.id.clone()),
            patch: TaskPatch::Title(title),
        })
    }

    pub fn request_toggle(&self, id: TaskId, checked: bool) -> Option<TaskRequest> {
        let identity = self.identity.as_ref()?;
        Some(TaskRequest::Update {
            scope: TaskScope::new(id, identity.id.clone()),
            patch: TaskPatch::Completed(checked),
        })
    }

    pub fn request_delete(&self, id: TaskId) -> Option<TaskRequest> {
        let identity = self.identity.as_ref()?;
        Some(TaskRequest::Delete {
            scope: TaskScope::new(id, identity.id.clone()),
        })
    }

    /// Move `active_id` to the position of `over_id`. Local only.
    pub fn reorder(&mut self, active_id: TaskId, over_id: TaskId) -> bool {
        move_by_key(&mut self.tasks, &active_id, &over_id, |task| &task.id)
    }

    /// Reconcile a finished round-trip into local state.
    ///
    /// Failures are logged and leave local state as it was (an open edit
    /// stays open). Completions for an identity other than the current one
    /// are dropped.
    pub fn apply(&mut self, completion: Completion) {
        let Completion { request, result } = completion;
        let operation = request.operation();
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!(
                    operation,
                    error = %err,
                    details = err.details().unwrap_or_default(),
                    "failed to {}",
                    operation
                );
                return;
            }
        };

        let Some(current) = self.identity.as_ref().map(|i| i.id.clone()) else {
            debug!(operation, "no identity; dropping completion");
            return;
        };
        if request_owner(&request) != current {
            debug!(operation, "completion for a previous identity; dropping");
            return;
        }

        match (request, response) {
            (TaskRequest::Load { user_id }, TaskResponse::Loaded(rows)) => {
                let total = rows.len();
                let tasks: Vec<Task> = rows.into_iter().filter(|t| t.user_id == user_id).collect();
                if tasks.len() != total {
                    warn!(
                        user_id = %user_id,
                        dropped = total - tasks.len(),
                        "store returned rows owned by another identity"
                    );
                }
                self.tasks = tasks;
            }
            (TaskRequest::Insert(new_task), TaskResponse::Inserted(rows)) => {
                self.tasks
                    .extend(rows.into_iter().filter(|t| t.user_id == new_task.user_id));
                self.new_task.clear();
            }
            (TaskRequest::Update { scope, patch }, TaskResponse::Updated(_)) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| scope.matches(t)) {
                    patch.apply_to(task);
                }
                if matches!(patch, TaskPatch::Title(_))
                    && self.editing.as_ref().map(|e| e.task_id) == Some(scope.id)
                {
                    self.editing = None;
                }
            }
            (TaskRequest::Delete { scope }, TaskResponse::Deleted(_)) => {
                self.tasks.retain(|t| !scope.matches(t));
            }
            (request, response) => {
                warn!(
                    operation = request.operation(),
                    response = ?response,
                    "response does not match request"
                );
            }
        }
    }

    /// Run a request to completion and reconcile it.
    pub async fn dispatch(
        &mut self,
        store: &dyn TaskStore,
        request: Option<TaskRequest>,
    ) -> Dispatch {
        let Some(request) = request else {
            return Dispatch::Skipped;
        };
        let completion = request.execute(store).await;
        let outcome = match &completion.result {
            Ok(response) => Dispatch::Applied(response.clone()),
            Err(err) => Dispatch::Failed(err.clone()),
        };
        self.apply(completion);
        outcome
    }

    pub async fn load(&mut self, store: &dyn TaskStore) -> Dispatch {
        let request = self.request_load();
        self.dispatch(store, request).await
    }

    pub async fn add(&mut self, store: &dyn TaskStore, title: &str) -> Dispatch {
        let request = self.request_add(title);
        self.dispatch(store, request).await
    }

    pub async fn save_edit(&mut self, store: &dyn TaskStore, id: TaskId) -> Dispatch {
        let request = self.request_save_edit(id);
        self.dispatch(store, request).await
    }

    pub async fn toggle(&mut self, store: &dyn TaskStore, id: TaskId, checked: bool) -> Dispatch {
        let request = self.request_toggle(id, checked);
        self.dispatch(store, request).await
    }

    pub async fn delete(&mut self, store: &dyn TaskStore, id: TaskId) -> Dispatch {
        let request = self.request_delete(id);
        self.dispatch(store, request).await
    }
}

fn request_owner(request: &TaskRequest) -> &str {
    match request {
        TaskRequest::Load { user_id } => user_id,
        TaskRequest::Insert(task) => &task.user_id,
        TaskRequest::Update { scope, .. } | TaskRequest::Delete { scope } => &scope.user_id,
    }
}
