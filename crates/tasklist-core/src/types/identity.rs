//! Identity type definitions
//!
//! Identity is owned by the external auth provider; this client only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type alias for the provider-issued user id
pub type UserId = String;

/// The authenticated user record controlling task ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-issued unique id
    pub id: UserId,
    /// Email address, when the provider exposes one
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
        }
    }

    /// Label shown next to "Logged in as:".
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(self.id.as_str())
    }
}

/// An authenticated session returned by sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: Identity,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// Email/password pair submitted from the entry screen.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_display_name_falls_back_to_id() {
        let with_email = Identity::new("u-1", "a@example.com");
        assert_eq!(with_email.display_name(), "a@example.com");

        let without_email = Identity {
            id: "u-2".to_string(),
            email: None,
        };
        assert_eq!(without_email.display_name(), "u-2");
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let mut session = Session {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
            user: Identity::new("u-1", "a@example.com"),
        };
        assert!(!session.is_expired_at(now));

        session.expires_at = Some(now - Duration::seconds(1));
        assert!(session.is_expired_at(now));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("a@example.com", "hunter22");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("a@example.com"));
        assert!(!rendered.contains("hunter22"));
    }
}
