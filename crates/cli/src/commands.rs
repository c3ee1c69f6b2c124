use crate::error::CliError;
use chrono::{DateTime, Local};
use clap::Args;
use engine_config::settings::{BatchSettings, paths::RunPaths};
use std::{collections::HashMap, path::PathBuf, time::Duration};

pub const DEFAULT_LOG_FILE: &str = "logs/batch_processing.log";

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, help = "Path to input CSV file containing customer data")]
    pub input: PathBuf,

    #[arg(
        long,
        help = "Path to output CSV file for results (default: scored_<input>_<timestamp>.csv)"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "API endpoint URL for predictions [default: http://localhost:8000/predict]")]
    pub api_url: Option<String>,

    #[arg(
        long,
        help = "Path to the JSON run summary (default: batch_summary_<timestamp>.json)"
    )]
    pub summary: Option<PathBuf>,

    #[arg(long, help = "Per-request timeout in seconds [default: 30]")]
    pub timeout_secs: Option<u64>,

    /// Rows scored at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Attempts per row, including the first; only network failures are retried
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Base delay between retries, doubled on every attempt
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    #[arg(long, default_value = DEFAULT_LOG_FILE, help = "Log file appended to during the run")]
    pub log_file: PathBuf,

    #[arg(long, help = "Optional .env file with CHURN_* settings")]
    pub env_file: Option<PathBuf>,
}

impl RunArgs {
    /// Flags override the environment, which overrides the defaults.
    pub fn settings(&self, env: &HashMap<String, String>) -> Result<BatchSettings, CliError> {
        let mut settings = BatchSettings::from_env(env)?;

        if let Some(url) = &self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(attempts) = self.max_attempts {
            settings.max_attempts = attempts;
        }
        if let Some(ms) = self.retry_delay_ms {
            settings.retry_delay = Duration::from_millis(ms);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn paths(&self, now: DateTime<Local>) -> RunPaths {
        RunPaths::resolve(
            self.input.clone(),
            self.output.clone(),
            self.summary.clone(),
            now,
        )
    }
}
