//! On-disk session persistence.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tasklist_core::auth::AuthError;
use tasklist_core::types::Session;

/// JSON file holding the current session between process runs.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session has been saved.
    pub fn load(&self) -> Result<Option<Session>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Connection(err.to_string())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AuthError::Serialization(e.to_string()))
    }

    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AuthError::Connection(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        write_private(&self.path, raw.as_bytes())
            .map_err(|e| AuthError::Connection(e.to_string()))
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Connection(err.to_string())),
        }
    }
}

/// Tokens are credentials: owner read/write only on unix.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten files left by older runs.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)
}
