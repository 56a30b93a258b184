//! Connection settings for the hosted backend.

use std::path::PathBuf;

/// Hosted backend configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL (without `/rest/v1` or `/auth/v1`).
    pub url: String,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
    /// Task table name.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Where the current session is persisted; `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            ..Self::default()
        }
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base(), path.trim_start_matches('/'))
    }

    pub(crate) fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base(), self.table)
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: "tasks".to_string(),
            timeout_secs: 15,
            session_file: None,
        }
    }
}
