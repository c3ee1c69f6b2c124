use engine_config::settings::error::SettingsError;
use engine_runtime::error::BatchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Batch processing failed: {0}")]
    Batch(#[from] BatchError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}
