use thiserror::Error;

/// Errors raised when resolving or validating batch settings.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    /// An environment variable holds a value of the wrong shape.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidEnvValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The prediction endpoint is not an http(s) URL.
    #[error("Invalid API URL '{0}': expected an http:// or https:// URL")]
    InvalidApiUrl(String),

    /// A numeric setting is outside its allowed range.
    #[error("Invalid setting {name}: {reason}")]
    OutOfRange { name: &'static str, reason: String },
}
