//! # Tasklist Config
//!
//! Single-file configuration for the tasklist client.
//! One `tasklist.yaml` selects the backend, its connection credentials and
//! observability settings.

mod loader;

pub use loader::{load_config, ConfigError};

use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration schema.
#[derive(Debug, Clone, Deserialize)]
pub struct TasklistConfig {
    /// Config schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for TasklistConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            backend: BackendConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_env(),
        }
    }
}

fn default_app_name() -> String {
    "tasklist".to_string()
}

fn default_env() -> String {
    "development".to_string()
}

/// Which backend serves auth and the task table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Supabase,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_kind")]
    pub kind: BackendKind,
    /// Project base URL, e.g. `https://<project>.supabase.co`.
    #[serde(default)]
    pub url: Option<String>,
    /// Literal anon key. Prefer `anon_key_env`.
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Environment variable holding the anon key.
    #[serde(default = "default_anon_key_env")]
    pub anon_key_env: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where the signed-in session is persisted between runs.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: default_backend_kind(),
            url: None,
            anon_key: None,
            anon_key_env: default_anon_key_env(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
            session_file: default_session_file(),
        }
    }
}

impl BackendConfig {
    /// Resolve the anon key: literal value first, then the named env var.
    pub fn resolve_anon_key(&self) -> Result<String, KeyError> {
        if let Some(key) = self.anon_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        let env_name = self.anon_key_env.as_ref().ok_or(KeyError::NotConfigured)?;
        std::env::var(env_name).map_err(|_| KeyError::EnvNotFound(env_name.clone()))
    }
}

fn default_backend_kind() -> BackendKind {
    BackendKind::Supabase
}

fn default_anon_key_env() -> Option<String> {
    Some("SUPABASE_ANON_KEY".to_string())
}

fn default_table() -> String {
    "tasks".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_session_file() -> String {
    ".tasklist/session.json".to_string()
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("anon key not configured")]
    NotConfigured,
    #[error("Environment variable '{0}' not found")]
    EnvNotFound(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_anon_key_prefers_literal() {
        let backend = BackendConfig {
            anon_key: Some("literal-key".to_string()),
            anon_key_env: Some("TASKLIST_TEST_UNSET_KEY".to_string()),
            ..BackendConfig::default()
        };
        assert_eq!(backend.resolve_anon_key().unwrap(), "literal-key");
    }

    #[test]
    fn test_resolve_anon_key_reports_missing_env() {
        let backend = BackendConfig {
            anon_key: None,
            anon_key_env: Some("TASKLIST_TEST_DEFINITELY_UNSET".to_string()),
            ..BackendConfig::default()
        };
        assert!(matches!(
            backend.resolve_anon_key(),
            Err(KeyError::EnvNotFound(name)) if name == "TASKLIST_TEST_DEFINITELY_UNSET"
        ));

        let backend = BackendConfig {
            anon_key: None,
            anon_key_env: None,
            ..BackendConfig::default()
        };
        assert!(matches!(
            backend.resolve_anon_key(),
            Err(KeyError::NotConfigured)
        ));
    }
}
