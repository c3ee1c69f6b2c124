use std::{
    fs::{self, File, OpenOptions},
    io,
    path::Path,
    sync::Arc,
};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: console output on stderr plus the log file.
///
/// `RUST_LOG` overrides the default `info` filter. When the log file cannot be
/// opened the run continues with console logging only.
pub fn init(log_file: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_writer(io::stderr).with_target(false);

    let (file_layer, open_error) = match open_log_file(log_file) {
        Ok(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file))),
            None,
        ),
        Err(err) => (None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    if let Some(err) = open_error {
        warn!(
            path = %log_file.display(),
            error = %err,
            "Could not open log file, logging to console only"
        );
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
