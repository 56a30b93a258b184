//! AuthProvider in-memory implementation.
//!
//! Mirrors the hosted provider's observable behavior closely enough to drive
//! the entry view offline: duplicate sign-ups, short passwords, unconfirmed
//! emails and bad credentials are rejected with the provider's messages.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use tasklist_core::auth::{AuthError, AuthProvider};
use tasklist_core::types::{Credentials, Identity, Session};

const MIN_PASSWORD_LEN: usize = 6;
const SESSION_TTL_SECS: i64 = 3_600;

struct Account {
    password: String,
    identity: Identity,
    confirmed: bool,
}

/// In-memory auth provider holding accounts and the current session.
pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Session>>,
    require_confirmation: bool,
}

impl InMemoryAuthProvider {
    /// Accounts can sign in immediately after sign-up.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            require_confirmation: false,
        }
    }

    /// Accounts must be confirmed with [`Self::confirm_email`] before sign-in.
    pub fn with_email_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::new()
        }
    }

    /// Mark an account's email as confirmed. Returns `false` if unknown.
    pub fn confirm_email(&self, email: &str) -> bool {
        match self.accounts.write() {
            Ok(mut accounts) => match accounts.get_mut(&normalize_email(email)) {
                Some(account) => {
                    account.confirmed = true;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn issue_session(identity: &Identity) -> Session {
        Session {
            access_token: uuid::Uuid::new_v4().to_string(),
            refresh_token: Some(uuid::Uuid::new_v4().to_string()),
            expires_at: Some(Utc::now() + Duration::seconds(SESSION_TTL_SECS)),
            user: identity.clone(),
        }
    }
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(AuthError::Rejected(
            "Unable to validate email address: invalid format".to_string(),
        ))
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError> {
        let email = normalize_email(&credentials.email);
        validate_email(&email)?;
        if credentials.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Rejected(format!(
                "Password should be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        if accounts.contains_key(&email) {
            return Err(AuthError::Rejected("User already registered".to_string()));
        }
        let identity = Identity::new(uuid::Uuid::new_v4().to_string(), email.clone());
        debug!(user_id = %identity.id, "account created");
        accounts.insert(
            email,
            Account {
                password: credentials.password.clone(),
                identity: identity.clone(),
                confirmed: !self.require_confirmation,
            },
        );

        if self.require_confirmation {
            return Ok(None);
        }
        let session = Self::issue_session(&identity);
        let mut current = self
            .session
            .write()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        *current = Some(session.clone());
        Ok(Some(session))
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        let account = accounts
            .get(&normalize_email(&credentials.email))
            .filter(|account| account.password == credentials.password)
            .ok_or_else(|| AuthError::Rejected("Invalid login credentials".to_string()))?;
        if !account.confirmed {
            return Err(AuthError::Rejected("Email not confirmed".to_string()));
        }

        let session = Self::issue_session(&account.identity);
        let mut current = self
            .session
            .write()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        *current = Some(session.clone());
        Ok(session)
    }

    async fn get_user(&self) -> Result<Option<Identity>, AuthError> {
        let current = self
            .session
            .read()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        Ok(current
            .as_ref()
            .filter(|session| !session.is_expired_at(Utc::now()))
            .map(|session| session.user.clone()))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut current = self
            .session
            .write()
            .map_err(|e| AuthError::Connection(e.to_string()))?;
        current.take().map(|_| ()).ok_or(AuthError::NoSession)
    }
}
