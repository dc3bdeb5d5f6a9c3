// logging.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: leveled lines to stdout and to `log_file`.
///
/// `RUST_LOG` overrides the default `info` filter. If the log file cannot be
/// opened we keep going with stdout only.
pub fn init(log_file: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let file = OpenOptions::new().create(true).append(true).open(log_file);

    match file {
        Ok(file) => {
            let file_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init();
        }
        Err(e) => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init();
            warn!("⚠️ Could not open log file {}: {e}", log_file.display());
        }
    }
}
