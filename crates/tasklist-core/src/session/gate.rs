//! SessionGate - identity resolution on view entry

use std::sync::Arc;

use tracing::{debug, warn};

use super::Route;
use crate::auth::{AuthError, AuthProvider};
use crate::types::Identity;

/// Result of resolving the current identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// An identity resolved; the task view may load
    Proceed(Identity),
    /// No identity; navigate away and do nothing else
    Redirect(Route),
}

impl GateDecision {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            GateDecision::Proceed(identity) => Some(identity),
            GateDecision::Redirect(_) => None,
        }
    }
}

/// Resolves the current identity from the auth provider.
///
/// A resolution failure is treated exactly like "no identity". No retries.
#[derive(Clone)]
pub struct SessionGate {
    auth: Arc<dyn AuthProvider>,
}

impl SessionGate {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    pub async fn resolve(&self) -> GateDecision {
        match self.auth.get_user().await {
            Ok(Some(identity)) => {
                debug!(user_id = %identity.id, "identity resolved");
                GateDecision::Proceed(identity)
            }
            Ok(None) => {
                debug!("no identity; redirecting to entry");
                GateDecision::Redirect(Route::Entry)
            }
            Err(err) => {
                debug!(error = %err, "identity resolution failed; redirecting to entry");
                GateDecision::Redirect(Route::Entry)
            }
        }
    }

    /// Invalidate the provider session. Always navigates to the entry view.
    pub async fn sign_out(&self) -> Route {
        match self.auth.sign_out().await {
            Ok(()) => {}
            Err(AuthError::NoSession) => debug!("no session; already signed out"),
            Err(err) => warn!(error = %err, "sign-out failed"),
        }
        Route::Entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Credentials, Session};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedAuth {
        user: Mutex<Result<Option<Identity>, AuthError>>,
        sign_outs: Mutex<usize>,
    }

    impl FixedAuth {
        fn new(user: Result<Option<Identity>, AuthError>) -> Arc<Self> {
            Arc::new(Self {
                user: Mutex::new(user),
                sign_outs: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl AuthProvider for FixedAuth {
        async fn sign_up(&self, _credentials: &Credentials) -> Result<Option<Session>, AuthError> {
            Ok(None)
        }

        async fn sign_in_with_password(
            &self,
            _credentials: &Credentials,
        ) -> Result<Session, AuthError> {
            Err(AuthError::Rejected("Invalid login credentials".to_string()))
        }

        async fn get_user(&self) -> Result<Option<Identity>, AuthError> {
            self.user.lock().unwrap().clone()
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            *self.sign_outs.lock().unwrap() += 1;
            let mut user = self.user.lock().unwrap();
            if matches!(*user, Ok(None)) {
                return Err(AuthError::NoSession);
            }
            *user = Ok(None);
            Ok(())
        }
    }

    #[test]
    fn test_resolve_proceeds_with_identity() {
        tokio_test::block_on(async {
            let identity = Identity::new("u-1", "a@example.com");
            let gate = SessionGate::new(FixedAuth::new(Ok(Some(identity.clone()))));
            assert_eq!(gate.resolve().await, GateDecision::Proceed(identity));
        });
    }

    #[test]
    fn test_resolve_failure_is_treated_as_no_identity() {
        tokio_test::block_on(async {
            let gate = SessionGate::new(FixedAuth::new(Err(AuthError::Connection(
                "refused".to_string(),
            ))));
            assert_eq!(gate.resolve().await, GateDecision::Redirect(Route::Entry));

            let gate = SessionGate::new(FixedAuth::new(Ok(None)));
            assert_eq!(gate.resolve().await, GateDecision::Redirect(Route::Entry));
        });
    }

    #[test]
    fn test_sign_out_invalidates_and_navigates_to_entry() {
        tokio_test::block_on(async {
            let auth = FixedAuth::new(Ok(Some(Identity::new("u-1", "a@example.com"))));
            let gate = SessionGate::new(auth.clone());
            assert_eq!(gate.sign_out().await, Route::Entry);
            assert_eq!(*auth.sign_outs.lock().unwrap(), 1);
            assert_eq!(gate.resolve().await, GateDecision::Redirect(Route::Entry));
        });
    }

    #[tokio::test]
    async fn test_sign_out_without_session_still_navigates_to_entry() {
        let auth = FixedAuth::new(Ok(Some(Identity::new("u-1", "a@example.com"))));
        let gate = SessionGate::new(auth.clone());
        assert_eq!(gate.sign_out().await, Route::Entry);
        assert_eq!(auth.sign_out().await, Err(AuthError::NoSession));
        assert_eq!(gate.sign_out().await, Route::Entry);
        assert_eq!(*auth.sign_outs.lock().unwrap(), 3);
    }
}
