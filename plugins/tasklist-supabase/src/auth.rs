//! Email/password auth against the hosted `/auth/v1` endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tasklist_core::auth::{AuthError, AuthProvider};
use tasklist_core::types::{Credentials, Identity, Session};

use crate::config::SupabaseConfig;
use crate::error::{auth_error, auth_transport};
use crate::session_file::SessionFile;

/// Auth client. Holds the current session and mirrors it to the session
/// file when one is configured.
pub struct SupabaseAuth {
    client: reqwest::Client,
    config: SupabaseConfig,
    session: RwLock<Option<Session>>,
    session_file: Option<SessionFile>,
}

#[derive(Debug, Serialize)]
struct PasswordBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserResponse> for Identity {
    fn from(user: UserResponse) -> Self {
        Identity {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserResponse,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Sign-up answers with a full session when the project auto-confirms, and
/// with the bare user record when email confirmation is pending.
fn parse_sign_up(body: Value, now: DateTime<Utc>) -> Result<Option<Session>, AuthError> {
    if body.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value::<TokenResponse>(body)
        .map(|token| Some(token.into_session(now)))
        .map_err(|e| AuthError::Serialization(e.to_string()))
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Connection(e.to_string()))?;

        let session_file = config.session_file.clone().map(SessionFile::new);
        let restored = match session_file.as_ref().map(SessionFile::load) {
            Some(Ok(session)) => session,
            Some(Err(err)) => {
                warn!(error = %err, "ignoring unreadable session file");
                None
            }
            None => None,
        };
        if let Some(session) = &restored {
            debug!(user_id = %session.user.id, "restored persisted session");
        }

        Ok(Self {
            client,
            config,
            session: RwLock::new(restored),
            session_file,
        })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Bearer token for user-scoped requests, if signed in.
    pub async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    fn headers(&self, bearer: Option<&str>) -> Result<HeaderMap, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.config.anon_key)
                .map_err(|e| AuthError::Connection(e.to_string()))?,
        );
        let token = bearer.unwrap_or(&self.config.anon_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AuthError::Connection(e.to_string()))?,
        );
        Ok(headers)
    }

    async fn store_session(&self, session: Option<Session>) {
        if let Some(file) = &self.session_file {
            let persisted = match &session {
                Some(session) => file.save(session),
                None => file.clear(),
            };
            if let Err(err) = persisted {
                warn!(path = %file.path().display(), error = %err, "failed to persist session");
            }
        }
        *self.session.write().await = session;
    }

    async fn request_token(
        &self,
        grant_type: &str,
        body: &impl Serialize,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .headers(self.headers(None)?)
            .json(body)
            .send()
            .await
            .map_err(auth_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(auth_error(status, &text));
        }

        let token: TokenResponse = response.json().await.map_err(auth_transport)?;
        Ok(token.into_session(Utc::now()))
    }

    /// `Ok(Err(status))` when the token was refused.
    async fn fetch_user(
        &self,
        access_token: &str,
    ) -> Result<Result<Identity, StatusCode>, AuthError> {
        let response = self
            .client
            .get(self.config.auth_url("user"))
            .headers(self.headers(Some(access_token))?)
            .send()
            .await
            .map_err(auth_transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(Err(status));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(auth_error(status, &text));
        }
        let user: UserResponse = response.json().await.map_err(auth_transport)?;
        Ok(Ok(user.into()))
    }

    /// One refresh attempt with the stored refresh token.
    async fn refresh(&self, refresh_token: &str) -> Option<Session> {
        match self
            .request_token("refresh_token", &RefreshBody { refresh_token })
            .await
        {
            Ok(session) => {
                debug!(user_id = %session.user.id, "session refreshed");
                self.store_session(Some(session.clone())).await;
                Some(session)
            }
            Err(err) => {
                debug!(error = %err, "session refresh failed");
                None
            }
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Option<Session>, AuthError> {
        let body = PasswordBody {
            email: credentials.email.trim(),
            password: &credentials.password,
        };
        let response = self
            .client
            .post(self.config.auth_url("signup"))
            .headers(self.headers(None)?)
            .json(&body)
            .send()
            .await
            .map_err(auth_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(auth_error(status, &text));
        }

        let value: Value = response.json().await.map_err(auth_transport)?;
        let session = parse_sign_up(value, Utc::now())?;
        if let Some(session) = &session {
            self.store_session(Some(session.clone())).await;
        }
        info!(email = %body.email, confirmed = session.is_some(), "sign-up accepted");
        Ok(session)
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let body = PasswordBody {
            email: credentials.email.trim(),
            password: &credentials.password,
        };
        let session = self.request_token("password", &body).await?;
        self.store_session(Some(session.clone())).await;
        Ok(session)
    }

    async fn get_user(&self) -> Result<Option<Identity>, AuthError> {
        let Some(session) = self.current_session().await else {
            return Ok(None);
        };

        if let Ok(identity) = self.fetch_user(&session.access_token).await? {
            return Ok(Some(identity));
        }

        let refreshed = match session.refresh_token.as_deref() {
            Some(refresh_token) => self.refresh(refresh_token).await,
            None => None,
        };
        let Some(refreshed) = refreshed else {
            self.store_session(None).await;
            return Ok(None);
        };
        match self.fetch_user(&refreshed.access_token).await? {
            Ok(identity) => Ok(Some(identity)),
            Err(_) => {
                self.store_session(None).await;
                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.current_session().await else {
            return Err(AuthError::NoSession);
        };
        // Local state goes first so a failed logout call still signs out here.
        self.store_session(None).await;

        let response = self
            .client
            .post(self.config.auth_url("logout"))
            .headers(self.headers(Some(&session.access_token))?)
            .send()
            .await
            .map_err(auth_transport)?;

        let status = response.status();
        // An already-expired token still counts as signed out.
        if status.is_success()
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::NOT_FOUND
        {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(auth_error(status, &text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::TestServer;
    use serde_json::json;
    use std::path::{Path, PathBuf};

    const REFRESHED: &str = r#"{"access_token":"new","refresh_token":"r2","expires_in":3600,"user":{"id":"u-1","email":"a@example.com"}}"#;
    const USER: &str = r#"{"id":"u-1","email":"a@example.com"}"#;

    fn scratch_session_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tasklist-auth-test-{}", std::process::id()))
            .join(name)
    }

    /// Client restored from a session file holding token `old` / refresh `r1`.
    fn restored_auth(url: &str, path: &Path) -> SupabaseAuth {
        SessionFile::new(path)
            .save(&Session {
                access_token: "old".to_string(),
                refresh_token: Some("r1".to_string()),
                expires_at: None,
                user: Identity::new("u-1", "a@example.com"),
            })
            .unwrap();
        let config = SupabaseConfig {
            session_file: Some(path.to_path_buf()),
            ..SupabaseConfig::new(url, "anon")
        };
        SupabaseAuth::new(config).unwrap()
    }

    #[test]
    fn test_token_response_uses_absolute_expiry_first() {
        let now = Utc::now();
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_700_000_000,
            "refresh_token": "r",
            "user": {"id": "u-1", "email": "a@example.com", "aud": "authenticated"}
        }))
        .unwrap();
        let session = token.into_session(now);
        assert_eq!(session.expires_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(session.refresh_token.as_deref(), Some("r"));
        assert_eq!(session.user, Identity::new("u-1", "a@example.com"));
    }

    #[test]
    fn test_token_response_falls_back_to_relative_expiry() {
        let now = Utc::now();
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "expires_in": 60,
            "user": {"id": "u-1"}
        }))
        .unwrap();
        let session = token.into_session(now);
        assert_eq!(session.expires_at, Some(now + Duration::seconds(60)));
        assert!(session.user.email.is_none());
    }

    #[test]
    fn test_sign_up_pending_confirmation_has_no_session() {
        let pending = json!({
            "id": "u-1",
            "email": "a@example.com",
            "confirmation_sent_at": "2024-01-01T00:00:00Z"
        });
        assert_eq!(parse_sign_up(pending, Utc::now()).unwrap(), None);

        let confirmed = json!({"access_token": "a", "user": {"id": "u-1"}});
        let session = parse_sign_up(confirmed, Utc::now()).unwrap().unwrap();
        assert_eq!(session.user.id, "u-1");
    }

    #[test]
    fn test_new_without_session_file_starts_signed_out() {
        tokio_test::block_on(async {
            let config = SupabaseConfig::new("https://demo.supabase.co", "anon");
            let auth = SupabaseAuth::new(config).unwrap();
            assert!(auth.access_token().await.is_none());
            assert_eq!(auth.get_user().await.unwrap(), None);
            assert_eq!(auth.sign_out().await, Err(AuthError::NoSession));
        });
    }

    #[tokio::test]
    #[ignore = "requires a live project and TASKLIST_LIVE_* env vars"]
    async fn test_live_sign_in_when_env_set() {
        let vars = [
            "TASKLIST_LIVE_URL",
            "TASKLIST_LIVE_ANON_KEY",
            "TASKLIST_LIVE_EMAIL",
            "TASKLIST_LIVE_PASSWORD",
        ]
        .map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
        let [Some(url), Some(anon_key), Some(email), Some(password)] = vars else {
            eprintln!("skipped: TASKLIST_LIVE_* env vars are not set");
            return;
        };

        let auth = SupabaseAuth::new(SupabaseConfig::new(url, anon_key))
            .expect("client should initialize");
        let session = auth
            .sign_in_with_password(&Credentials::new(email, password))
            .await
            .expect("live sign-in should succeed");
        assert_eq!(auth.get_user().await.unwrap(), Some(session.user));
        auth.sign_out().await.expect("live sign-out should succeed");
    }

    #[tokio::test]
    async fn test_get_user_refreshes_once_after_unauthorized() {
        let server = TestServer::start(vec![
            (401, r#"{"msg":"JWT expired"}"#),
            (200, REFRESHED),
            (200, USER),
        ])
        .await;
        let path = scratch_session_path("refresh_ok.json");
        let auth = restored_auth(&server.url, &path);

        assert_eq!(
            auth.get_user().await.unwrap(),
            Some(Identity::new("u-1", "a@example.com"))
        );
        assert_eq!(
            server.lines(),
            vec![
                "GET /auth/v1/user",
                "POST /auth/v1/token?grant_type=refresh_token",
                "GET /auth/v1/user",
            ]
        );
        let recorded = server.recorded();
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer old"));
        assert_eq!(recorded[1].body, r#"{"refresh_token":"r1"}"#);
        assert_eq!(recorded[2].authorization.as_deref(), Some("Bearer new"));

        assert_eq!(auth.access_token().await.as_deref(), Some("new"));
        let persisted = SessionFile::new(path.clone()).load().unwrap().unwrap();
        assert_eq!(persisted.access_token, "new");
        assert_eq!(persisted.refresh_token.as_deref(), Some("r2"));
        SessionFile::new(path).clear().unwrap();
    }

    #[tokio::test]
    async fn test_refused_refresh_signs_out_without_further_retry() {
        let server = TestServer::start(vec![
            (401, r#"{"msg":"JWT expired"}"#),
            (
                400,
                r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#,
            ),
        ])
        .await;
        let path = scratch_session_path("refresh_refused.json");
        let auth = restored_auth(&server.url, &path);

        assert_eq!(auth.get_user().await.unwrap(), None);
        assert_eq!(
            server.lines(),
            vec![
                "GET /auth/v1/user",
                "POST /auth/v1/token?grant_type=refresh_token",
            ]
        );
        assert!(auth.access_token().await.is_none());
        assert_eq!(SessionFile::new(path).load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_still_unauthorized_after_refresh_signs_out() {
        let server = TestServer::start(vec![
            (401, r#"{"msg":"JWT expired"}"#),
            (200, REFRESHED),
            (401, r#"{"msg":"JWT expired"}"#),
        ])
        .await;
        let path = scratch_session_path("refresh_then_401.json");
        let auth = restored_auth(&server.url, &path);

        assert_eq!(auth.get_user().await.unwrap(), None);
        assert_eq!(server.lines().len(), 3);
        assert!(auth.access_token().await.is_none());
        assert_eq!(SessionFile::new(path).load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out_clears_local_session_before_logout_call() {
        let server = TestServer::start(vec![(500, r#"{"msg":"upstream down"}"#)]).await;
        let path = scratch_session_path("sign_out.json");
        let auth = restored_auth(&server.url, &path);

        assert_eq!(
            auth.sign_out().await,
            Err(AuthError::Rejected("upstream down".to_string()))
        );
        let recorded = server.recorded();
        assert_eq!(server.lines(), vec!["POST /auth/v1/logout"]);
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer old"));
        assert!(auth.access_token().await.is_none());
        assert_eq!(SessionFile::new(path).load().unwrap(), None);
        assert_eq!(auth.sign_out().await, Err(AuthError::NoSession));
    }
}
