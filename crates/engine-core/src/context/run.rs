use crate::metrics::{Metrics, MetricsSnapshot};
use chrono::{DateTime, Utc};
use std::{
    path::Path,
    time::{Duration, Instant},
};
use tracing::{Span, info, info_span};
use uuid::Uuid;

/// Rows between two progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// Per-run logging and reporting context.
///
/// Created once when a batch run starts and handed to every component that
/// logs or counts on behalf of the run. [`RunContext::finish`] closes it and
/// yields the timing and counters of the run.
#[derive(Debug)]
pub struct RunContext {
    run_id: String,
    started_at: DateTime<Utc>,
    started: Instant,
    metrics: Metrics,
    span: Span,
    progress_interval: u64,
}

/// What a finished [`RunContext`] leaves behind.
#[derive(Debug, Clone)]
pub struct RunTiming {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub metrics: MetricsSnapshot,
}

impl RunContext {
    pub fn new(input: impl AsRef<Path>) -> Self {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("batch_run", run_id = %run_id, input = %input.as_ref().display());

        RunContext {
            run_id,
            started_at: Utc::now(),
            started: Instant::now(),
            metrics: Metrics::new(),
            span,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Log a progress line every `rows` processed rows. Zero disables it.
    pub fn with_progress_interval(mut self, rows: u64) -> Self {
        self.progress_interval = rows;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Span every log line of the run is recorded under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Called after each row has been recorded in the metrics.
    pub fn row_finished(&self, total_rows: usize) {
        if self.progress_interval == 0 {
            return;
        }

        let done = self.metrics.rows_processed();
        if done % self.progress_interval == 0 && done < total_rows as u64 {
            let snapshot = self.metrics.snapshot();
            self.span.in_scope(|| {
                info!(
                    done,
                    total = total_rows,
                    succeeded = snapshot.rows_succeeded,
                    failed = snapshot.failures.total(),
                    "Batch progress"
                );
            });
        }
    }

    pub fn finish(self) -> RunTiming {
        let timing = RunTiming {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed: self.started.elapsed(),
            metrics: self.metrics.snapshot(),
        };

        self.span.in_scope(|| {
            info!(
                rows = timing.metrics.rows_processed,
                requests = timing.metrics.requests_sent,
                retries = timing.metrics.retry_count,
                elapsed_ms = timing.elapsed.as_millis() as u64,
                "Batch run context closed"
            );
        });

        timing
    }
}
