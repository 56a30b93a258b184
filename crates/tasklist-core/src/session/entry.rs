//! EntryForm - state of the sign-in / sign-up view
//!
//! Auth failures are the only errors the client shows to the user; they land
//! in `message` prefixed with the action that failed.

use tracing::info;

use super::Route;
use crate::auth::{AuthError, AuthProvider};
use crate::types::{Credentials, Session};

pub const SIGN_UP_CONFIRMATION: &str = "Check your email for the confirmation link!";

#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub email: String,
    pub password: String,
    message: Option<String>,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }

    pub async fn sign_up(&mut self, auth: &dyn AuthProvider) -> Route {
        let result = auth.sign_up(&self.credentials()).await;
        self.apply_sign_up(result)
    }

    pub async fn sign_in(&mut self, auth: &dyn AuthProvider) -> Route {
        let result = auth.sign_in_with_password(&self.credentials()).await;
        self.apply_sign_in(result)
    }

    /// Sign-up never leaves the entry view; the user confirms by email first.
    pub fn apply_sign_up(&mut self, result: Result<Option<Session>, AuthError>) -> Route {
        match result {
            Ok(_) => {
                info!(email = %self.email, "sign-up accepted");
                self.message = Some(SIGN_UP_CONFIRMATION.to_string());
            }
            Err(err) => {
                self.message = Some(format!("Error signing up: {}", err.message()));
            }
        }
        Route::Entry
    }

    pub fn apply_sign_in(&mut self, result: Result<Session, AuthError>) -> Route {
        match result {
            Ok(session) => {
                info!(user_id = %session.user.id, "signed in");
                Route::Tasks
            }
            Err(err) => {
                self.message = Some(format!("Error signing in: {}", err.message()));
                Route::Entry
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;

    fn sample_session() -> Session {
        Session {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
            user: Identity::new("u-1", "a@example.com"),
        }
    }

    #[test]
    fn test_sign_in_success_navigates_to_tasks() {
        let mut form = EntryForm::new();
        assert_eq!(form.apply_sign_in(Ok(sample_session())), Route::Tasks);
        assert!(form.message().is_none());
    }

    #[test]
    fn test_sign_in_failure_shows_provider_message() {
        let mut form = EntryForm::new();
        let route = form.apply_sign_in(Err(AuthError::Rejected(
            "Invalid login credentials".to_string(),
        )));
        assert_eq!(route, Route::Entry);
        assert_eq!(
            form.message(),
            Some("Error signing in: Invalid login credentials")
        );
    }

    #[test]
    fn test_sign_up_outcomes_stay_on_entry() {
        let mut form = EntryForm::new();
        assert_eq!(form.apply_sign_up(Ok(None)), Route::Entry);
        assert_eq!(form.message(), Some(SIGN_UP_CONFIRMATION));

        let route = form.apply_sign_up(Err(AuthError::Rejected(
            "User already registered".to_string(),
        )));
        assert_eq!(route, Route::Entry);
        assert_eq!(
            form.message(),
            Some("Error signing up: User already registered")
        );
    }
}
