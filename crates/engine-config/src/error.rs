use thiserror::Error;

/// Errors raised while persisting the run artifacts.
#[derive(Debug, Error)]
pub enum ReportGenerationError {
    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
