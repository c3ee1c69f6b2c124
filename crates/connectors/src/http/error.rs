use engine_core::retry::RetryDisposition;
use model::prediction::outcome::{ErrorKind, PredictionOutcome};
use thiserror::Error;

/// Failure of one request to the prediction endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint answered with a non-200 status.
    #[error("API returned status {status}")]
    Status { status: u16, detail: Option<String> },

    /// The request did not complete: connection refused, DNS, timeout.
    #[error("Request failed: {0}")]
    Transport(String),

    /// A 200 answer whose body is not a prediction.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// The HTTP client itself could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Status { .. } => ErrorKind::HttpError,
            ClientError::Transport(_) => ErrorKind::NetworkError,
            ClientError::InvalidBody(_) | ClientError::Build(_) => ErrorKind::Unknown,
        }
    }

    /// Only transport failures are retried; an answer from the endpoint,
    /// whatever its status, is final.
    pub fn retry_disposition(&self) -> RetryDisposition {
        match self {
            ClientError::Transport(_) => RetryDisposition::Retry,
            ClientError::Status { .. } | ClientError::InvalidBody(_) | ClientError::Build(_) => {
                RetryDisposition::Stop
            }
        }
    }

    pub fn into_outcome(self) -> PredictionOutcome {
        PredictionOutcome::failure(self.kind(), self.to_string())
    }

    /// Flattens a transport error and its sources into one message, since the
    /// top-level reqwest message rarely names the cause.
    pub fn transport(err: &reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !message.contains(&cause_text) {
                message.push_str(": ");
                message.push_str(&cause_text);
            }
            source = cause.source();
        }
        if err.is_timeout() && !message.contains("timed out") {
            message.push_str(" (timed out)");
        }
        ClientError::Transport(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_carry_the_code_in_the_message() {
        let err = ClientError::Status {
            status: 500,
            detail: Some("Prediction failed".into()),
        };
        assert_eq!(err.to_string(), "API returned status 500");
        assert_eq!(err.kind(), ErrorKind::HttpError);
        assert_eq!(err.retry_disposition(), RetryDisposition::Stop);
    }

    #[test]
    fn transport_errors_are_retryable_network_errors() {
        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "Request failed: connection refused");
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.retry_disposition(), RetryDisposition::Retry);
    }

    #[test]
    fn invalid_bodies_are_unknown_failures() {
        let outcome = ClientError::InvalidBody("missing field".into()).into_outcome();
        assert_eq!(
            outcome,
            PredictionOutcome::failure(ErrorKind::Unknown, "Invalid response body: missing field")
        );
    }
}
