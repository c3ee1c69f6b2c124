use crate::report::statistics::{PredictionStatistics, summarize};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use engine_core::{context::run::RunTiming, metrics::FailureBreakdown};
use serde::Serialize;
use std::path::Path;

/// Counts gathered by the orchestrator once every row has been merged back
/// into input order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCounts<'a> {
    pub total: u64,
    pub succeeded: u64,
    pub probabilities: &'a [f64],
}

/// Run-level summary, written as the JSON summary artifact.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub input_file: String,
    pub output_file: String,
    pub total_customers: u64,
    pub successful_predictions: u64,
    pub failed_predictions: u64,
    /// Percentage of rows that got a prediction, 0 when there are no rows.
    pub success_rate: f64,
    pub statistics: PredictionStatistics,
    pub failures: FailureBreakdown,
    pub retries: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub processing_timestamp: String,
}

impl RunSummary {
    pub fn new(input: &Path, output: &Path, counts: RunCounts<'_>, timing: &RunTiming) -> Self {
        let failed = counts.total.saturating_sub(counts.succeeded);

        RunSummary {
            run_id: timing.run_id.clone(),
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            total_customers: counts.total,
            successful_predictions: counts.succeeded,
            failed_predictions: failed,
            success_rate: success_rate(counts.succeeded, counts.total),
            statistics: summarize(counts.probabilities),
            failures: timing.metrics.failures,
            retries: timing.metrics.retry_count,
            started_at: timing.started_at,
            finished_at: timing.finished_at,
            duration_ms: timing.elapsed.as_millis() as u64,
            processing_timestamp: timing
                .finished_at
                .with_timezone(&Local)
                .to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn success_rate(succeeded: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        succeeded as f64 / total as f64 * 100.0
    }
}
