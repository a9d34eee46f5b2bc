use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub(crate) enum InitError {
    #[error("logging has already been initialised")]
    AlreadyInitialised,
    #[error("failed to open log file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
}

/// Sends tracing output to `path`; the terminal itself belongs to the UI.
pub(crate) fn init_file_logging(path: &Path) -> Result<(), InitError> {
    let file = open_log(path)?;
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    Registry::default().with(filter).with(fmt_layer).init();
    Ok(())
}

fn open_log(path: &Path) -> Result<File, InitError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| InitError::Open {
            path: path.to_path_buf(),
            source,
        })
}
