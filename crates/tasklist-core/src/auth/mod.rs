//! Auth module
//!
//! The auth provider is an external collaborator: it issues sessions and
//! resolves the current identity. Implementations live in tasklist-stores
//! (in-memory) and tasklist-supabase (hosted).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Credentials, Identity, Session};

/// Auth error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The provider refused the request; carries its human-readable message
    #[error("{0}")]
    Rejected(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Auth session missing!")]
    NoSession,
}

impl AuthError {
    /// Message shown on the entry screen.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// AuthProvider trait - async interface to the external auth service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a new account. `None` when the provider requires email
    /// confirmation before issuing a session.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError>;

    /// Exchange email/password for a session
    async fn sign_in_with_password(&self, credentials: &Credentials)
        -> Result<Session, AuthError>;

    /// Resolve the identity behind the current session, if any
    async fn get_user(&self) -> Result<Option<Identity>, AuthError>;

    /// Invalidate the current session
    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[async_trait]
impl AuthProvider for Arc<dyn AuthProvider> {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError> {
        (**self).sign_up(credentials).await
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        (**self).sign_in_with_password(credentials).await
    }

    async fn get_user(&self) -> Result<Option<Identity>, AuthError> {
        (**self).get_user().await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        (**self).sign_out().await
    }
}
