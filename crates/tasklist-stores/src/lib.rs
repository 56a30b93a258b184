//! # Tasklist Stores
//!
//! Minimal in-process backends for the tasklist client.
//!
//! This crate provides:
//! - InMemory TaskStore
//! - InMemory AuthProvider

mod auth_provider;
mod task_store;

pub use auth_provider::InMemoryAuthProvider;
pub use task_store::InMemoryTaskStore;

// Re-export core traits for convenience
pub use tasklist_core::auth::{AuthError, AuthProvider};
pub use tasklist_core::store::{StoreError, TaskStore};
