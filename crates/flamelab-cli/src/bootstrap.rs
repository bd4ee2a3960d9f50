//! CLI bootstrap: environment, logging and settings.
//!
//! This is the one place where the settings file is located and loaded.
//! Handlers receive the result as a [`CliContext`].

use std::path::PathBuf;

use flamelab_core::{Settings, default_settings_path};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Everything a handler needs from the environment.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Settings loaded from `settings_path`, or defaults when it is absent.
    pub settings: Settings,
    pub settings_path: PathBuf,
}

/// Load `.env` from the working directory, if there is one.
pub fn load_env() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `info`. Logs go to stderr so tables on stdout stay clean.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

/// Resolve the settings path and load it.
pub fn bootstrap(config: Option<PathBuf>) -> Result<CliContext, CliError> {
    let settings_path = match config {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let settings = Settings::load(&settings_path)?;
    tracing::debug!(path = %settings_path.display(), "Settings ready");
    Ok(CliContext {
        settings,
        settings_path,
    })
}
