//! Type definitions
//!
//! - Identity / Session: read-only records issued by the auth provider
//! - Task / NewTask: rows of the remote task table
//! - TaskScope / TaskPatch: filters and field updates for scoped mutations

mod identity;
mod task;

pub use identity::{Credentials, Identity, Session, UserId};
pub use task::{NewTask, Task, TaskId, TaskPatch, TaskScope};

pub(crate) use task::normalize_title;
