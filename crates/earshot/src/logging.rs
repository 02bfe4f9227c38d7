//! File logging for terminal hosts.
//!
//! A host that draws on the terminal cannot log to it, so everything goes to
//! an append-only file instead. The filter comes from `RUST_LOG` and defaults
//! to `info`; `RUST_LOG=earshot_core=debug` shows every dispatch decision and
//! `earshot::speech=info` every announcement.

use crate::runtime::HostError;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber writing to `path`.
pub fn init_logging(path: impl AsRef<Path>) -> Result<(), HostError> {
    let path = path.as_ref();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| HostError::Logging(err.to_string()))?;
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
