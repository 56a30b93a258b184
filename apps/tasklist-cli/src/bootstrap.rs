use std::fs::{create_dir_all, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::Context;

use tasklist_config::{load_config, BackendKind, ObservabilityConfig, TasklistConfig};
use tasklist_core::auth::AuthProvider;
use tasklist_core::session::SessionGate;
use tasklist_core::store::TaskStore;
use tasklist_stores::{InMemoryAuthProvider, InMemoryTaskStore};
use tasklist_supabase::{SupabaseAuth, SupabaseConfig, SupabaseTaskStore};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Where diagnostics go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// The TUI owns the terminal: log file if configured, otherwise nowhere.
    FileOrSilent,
}

/// Everything a command needs: loaded config and the shared backend.
#[derive(Clone)]
pub struct Bootstrap {
    pub config: TasklistConfig,
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn TaskStore>,
}

impl Bootstrap {
    pub fn from_config(path: &Path, verbose: bool, log_target: LogTarget) -> anyhow::Result<Self> {
        let config =
            load_config(path).with_context(|| format!("load config {}", path.display()))?;
        init_tracing_if_needed(&config.observability, verbose, log_target);
        let (auth, store) = build_backend(&config)?;
        tracing::debug!(
            app = %config.app.name,
            environment = %config.app.environment,
            backend = ?config.backend.kind,
            "backend ready"
        );
        Ok(Self {
            config,
            auth,
            store,
        })
    }

    pub fn gate(&self) -> SessionGate {
        SessionGate::new(self.auth.clone())
    }
}

type Backend = (Arc<dyn AuthProvider>, Arc<dyn TaskStore>);

fn build_backend(config: &TasklistConfig) -> anyhow::Result<Backend> {
    match config.backend.kind {
        BackendKind::InMemory => {
            tracing::warn!("in-memory backend selected; nothing outlives this process");
            let auth: Arc<dyn AuthProvider> = Arc::new(InMemoryAuthProvider::new());
            let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
            Ok((auth, store))
        }
        BackendKind::Supabase => {
            let anon_key = config
                .backend
                .resolve_anon_key()
                .context("resolve backend anon key")?;
            let supabase = SupabaseConfig {
                url: config.backend.url.clone().unwrap_or_default(),
                anon_key,
                table: config.backend.table.clone(),
                timeout_secs: config.backend.timeout_secs,
                session_file: Some(PathBuf::from(&config.backend.session_file)),
            };
            let supabase_auth = Arc::new(SupabaseAuth::new(supabase).context("build auth client")?);
            let store: Arc<dyn TaskStore> = Arc::new(
                SupabaseTaskStore::new(supabase_auth.clone()).context("build task store client")?,
            );
            let auth: Arc<dyn AuthProvider> = supabase_auth;
            Ok((auth, store))
        }
    }
}

fn init_tracing_if_needed(observability: &ObservabilityConfig, verbose: bool, target: LogTarget) {
    TRACING_INIT.get_or_init(|| {
        let fallback_level = if verbose {
            "debug"
        } else {
            match observability.log_level.trim().to_ascii_lowercase().as_str() {
                "trace" => "trace",
                "debug" => "debug",
                "info" => "info",
                "warn" => "warn",
                "error" => "error",
                _ => "info",
            }
        };

        let make_filter = || {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        };

        let file_writer = observability
            .log_file
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .and_then(create_log_writer);

        match (target, file_writer) {
            (_, Some(writer)) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(make_filter())
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .try_init();
            }
            (LogTarget::FileOrSilent, None) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(make_filter())
                    .with_writer(std::io::sink)
                    .try_init();
            }
            (LogTarget::Stderr, None) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(make_filter())
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .try_init();
            }
        }

        tracing::debug!(
            log_level = %observability.log_level,
            log_file = observability.log_file.as_deref().unwrap_or("(stderr)"),
            "tracing initialized"
        );
    });
}

fn create_log_writer(path: &str) -> Option<Mutex<std::fs::File>> {
    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).ok()?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
        .map(Mutex::new)
}
