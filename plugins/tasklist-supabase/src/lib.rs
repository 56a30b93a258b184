//! Hosted backend for the tasklist client.
//!
//! - `SupabaseAuth`: email/password auth against the `/auth/v1` endpoints
//! - `SupabaseTaskStore`: the task table through the `/rest/v1` endpoints
//! - `SessionFile`: on-disk session persistence between runs

mod auth;
mod config;
mod error;
mod session_file;
mod task_store;

#[cfg(test)]
mod test_server;

pub use auth::SupabaseAuth;
pub use config::SupabaseConfig;
pub use session_file::SessionFile;
pub use task_store::SupabaseTaskStore;

pub use tasklist_core::auth::{AuthError, AuthProvider};
pub use tasklist_core::store::{StoreError, TaskStore};
