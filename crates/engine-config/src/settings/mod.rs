pub mod error;
pub mod paths;

use crate::settings::error::SettingsError;
use engine_core::{context::run::DEFAULT_PROGRESS_INTERVAL, retry::RetryPolicy};
use reqwest::Url;
use std::{collections::HashMap, str::FromStr, time::Duration};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/predict";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 200;

/// Environment variables read by [`BatchSettings::from_env`].
pub const ENV_API_URL: &str = "CHURN_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHURN_TIMEOUT_SECS";
pub const ENV_CONCURRENCY: &str = "CHURN_CONCURRENCY";
pub const ENV_MAX_ATTEMPTS: &str = "CHURN_MAX_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "CHURN_RETRY_DELAY_MS";

/// Tunables of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSettings {
    pub api_url: String,
    /// Upper bound on the wall-clock time of one request attempt.
    pub timeout: Duration,
    /// Rows scored at once. `1` reproduces strictly sequential scoring.
    pub concurrency: usize,
    /// Attempts per row, including the first. Only transport failures are
    /// retried.
    pub max_attempts: usize,
    /// Base delay of the exponential retry backoff.
    pub retry_delay: Duration,
    /// Log a progress line every this many rows. Zero disables it.
    pub progress_interval: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl BatchSettings {
    /// Defaults overlaid with the `CHURN_*` variables present in `vars`.
    pub fn from_env(vars: &HashMap<String, String>) -> Result<Self, SettingsError> {
        let mut settings = BatchSettings::default();

        if let Some(url) = vars.get(ENV_API_URL) {
            settings.api_url = url.trim().to_string();
        }
        if let Some(secs) = parse_var::<u64>(vars, ENV_TIMEOUT_SECS)? {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(concurrency) = parse_var::<usize>(vars, ENV_CONCURRENCY)? {
            settings.concurrency = concurrency;
        }
        if let Some(attempts) = parse_var::<usize>(vars, ENV_MAX_ATTEMPTS)? {
            settings.max_attempts = attempts;
        }
        if let Some(ms) = parse_var::<u64>(vars, ENV_RETRY_DELAY_MS)? {
            settings.retry_delay = Duration::from_millis(ms);
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let valid_url = Url::parse(self.api_url.trim()).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        });
        if !valid_url {
            return Err(SettingsError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.timeout < Duration::from_secs(1) {
            return Err(SettingsError::OutOfRange {
                name: "timeout",
                reason: "must be at least 1 second".into(),
            });
        }
        if self.concurrency == 0 {
            return Err(SettingsError::OutOfRange {
                name: "concurrency",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_attempts == 0 {
            return Err(SettingsError::OutOfRange {
                name: "max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        if self.max_attempts <= 1 {
            RetryPolicy::none()
        } else {
            RetryPolicy::exponential(self.max_attempts, self.retry_delay)
        }
    }
}

fn parse_var<T>(vars: &HashMap<String, String>, key: &str) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| SettingsError::InvalidEnvValue {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
