//! Configuration loading.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::{BackendKind, TasklistConfig};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load full configuration from YAML file.
pub fn load_config(path: &Path) -> Result<TasklistConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub(crate) fn parse_config(content: &str) -> Result<TasklistConfig, ConfigError> {
    let config: TasklistConfig = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TasklistConfig) -> Result<(), ConfigError> {
    if config.version == 0 {
        return Err(ConfigError::Invalid(
            "version must be greater than 0".to_string(),
        ));
    }

    if config.app.name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "app.name must not be empty".to_string(),
        ));
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "backend.timeout_secs must be > 0".to_string(),
        ));
    }

    if config.backend.kind == BackendKind::Supabase {
        let url = config.backend.url.as_deref().unwrap_or_default().trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid(
                "backend.url must be set for the supabase backend".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "backend.url '{}' must start with http:// or https://",
                url
            )));
        }
        if config.backend.table.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.table must not be empty".to_string(),
            ));
        }
        if config.backend.session_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.session_file must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
