//! Store module
//!
//! This module provides the data store abstraction:
//! - TaskStore: remote task table (async trait)
//!
//! Note: Implementations are in tasklist-stores and tasklist-supabase

mod task_store;

pub use task_store::TaskStore;

use thiserror::Error;

/// Store error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Error reported by the store itself, with its message/detail fields
    #[error("{message}")]
    Remote {
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            code: None,
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Remote { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}
