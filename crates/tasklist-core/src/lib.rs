//! # Tasklist Core
//!
//! Core abstractions and deterministic logic for the tasklist client.
//!
//! This crate contains:
//! - Identity / Session / Task definitions
//! - AuthProvider / TaskStore collaborator traits
//! - Session gate and entry form
//! - Task list controller (request -> remote round-trip -> reconcile)
//!
//! This crate does NOT care about:
//! - Which backend stores the rows
//! - How the list is displayed
//! - How requests are scheduled onto a runtime

pub mod auth;
pub mod controller;
pub mod session;
pub mod store;
pub mod types;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::auth::{AuthError, AuthProvider};
    pub use crate::controller::{
        move_item, Completion, Dispatch, EditState, TaskListController, TaskRequest,
        TaskResponse,
    };
    pub use crate::session::{EntryForm, GateDecision, Route, SessionGate};
    pub use crate::store::{StoreError, TaskStore};
    pub use crate::types::{
        Credentials, Identity, NewTask, Session, Task, TaskId, TaskPatch, TaskScope, UserId,
    };
}

// Re-export key types at crate root
pub use auth::{AuthError, AuthProvider};
pub use controller::{Completion, Dispatch, TaskListController, TaskRequest, TaskResponse};
pub use session::{EntryForm, GateDecision, Route, SessionGate};
pub use store::{StoreError, TaskStore};
pub use types::{Credentials, Identity, NewTask, Session, Task, TaskId, TaskPatch, TaskScope};
