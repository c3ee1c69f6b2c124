use connectors::{file::csv::error::FileError, http::error::ClientError};
use engine_config::{error::ReportGenerationError, settings::error::SettingsError};
use thiserror::Error;

/// Errors that abort a whole batch run.
///
/// A failed prediction for one row is never one of these; it is recorded in
/// that row's output cells instead.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input table could not be read. Nothing has been written.
    #[error("Failed to load input: {0}")]
    Input(#[source] FileError),

    /// The scored table could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[source] FileError),

    /// The summary artifact could not be written.
    #[error("Failed to write summary: {0}")]
    Summary(#[from] ReportGenerationError),

    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to initialize prediction client: {0}")]
    Client(#[from] ClientError),
}
