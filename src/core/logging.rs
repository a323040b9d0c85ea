//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing to stderr. The filter comes
//! from `RUST_LOG` and falls back to `info`.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

static INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the subscriber. Subsequent calls, including concurrent first
/// calls, are no-ops.
pub fn init() -> Result<(), LoggingError> {
    let mut result = Ok(());
    INITIALIZED.get_or_init(|| result = install());
    result
}

fn install() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!("Logging initialized");
    Ok(())
}
