//! Session module
//!
//! - SessionGate: resolves the current identity or redirects to the entry view
//! - EntryForm: sign-up / sign-in state of the entry view

mod entry;
mod gate;

pub use entry::{EntryForm, SIGN_UP_CONFIRMATION};
pub use gate::{GateDecision, SessionGate};

/// Navigation targets of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in / sign-up view
    Entry,
    /// Task list view
    Tasks,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Entry => "/",
            Route::Tasks => "/tasks",
        }
    }
}
