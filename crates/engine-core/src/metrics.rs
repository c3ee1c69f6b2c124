use model::prediction::outcome::ErrorKind;
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    rows_processed: AtomicU64,
    rows_succeeded: AtomicU64,
    http_errors: AtomicU64,
    network_errors: AtomicU64,
    unknown_errors: AtomicU64,
    requests_sent: AtomicU64,
    retry_count: AtomicU64,
}

/// Live counters shared by every worker of a run.
///
/// These feed progress logging and the failure breakdown of the summary. The
/// authoritative success/failure totals come from the ordered merge in the
/// orchestrator.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureBreakdown {
    pub http_error: u64,
    pub network_error: u64,
    pub unknown: u64,
}

impl FailureBreakdown {
    pub fn total(&self) -> u64 {
        self.http_error + self.network_error + self.unknown
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rows_processed: u64,
    pub rows_succeeded: u64,
    pub failures: FailureBreakdown,
    pub requests_sent: u64,
    pub retry_count: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn record_success(&self) {
        self.inner.rows_processed.fetch_add(1, Ordering::Relaxed);
        self.inner.rows_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        self.inner.rows_processed.fetch_add(1, Ordering::Relaxed);
        let counter = match kind {
            ErrorKind::HttpError => &self.inner.http_errors,
            ErrorKind::NetworkError => &self.inner.network_errors,
            ErrorKind::Unknown => &self.inner.unknown_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests(&self, count: u64) {
        self.inner.requests_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_retries(&self, count: u64) {
        self.inner.retry_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn rows_processed(&self) -> u64 {
        self.inner.rows_processed.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_processed: self.inner.rows_processed.load(Ordering::Relaxed),
            rows_succeeded: self.inner.rows_succeeded.load(Ordering::Relaxed),
            failures: FailureBreakdown {
                http_error: self.inner.http_errors.load(Ordering::Relaxed),
                network_error: self.inner.network_errors.load(Ordering::Relaxed),
                unknown: self.inner.unknown_errors.load(Ordering::Relaxed),
            },
            requests_sent: self.inner.requests_sent.load(Ordering::Relaxed),
            retry_count: self.inner.retry_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_bucketed_by_kind() {
        let metrics = Metrics::new();
        metrics.record_success();
        metrics.record_failure(ErrorKind::HttpError);
        metrics.record_failure(ErrorKind::NetworkError);
        metrics.record_failure(ErrorKind::NetworkError);
        metrics.increment_requests(5);
        metrics.increment_retries(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rows_processed, 4);
        assert_eq!(snapshot.rows_succeeded, 1);
        assert_eq!(
            snapshot.failures,
            FailureBreakdown {
                http_error: 1,
                network_error: 2,
                unknown: 0,
            }
        );
        assert_eq!(snapshot.failures.total(), 3);
        assert_eq!(snapshot.requests_sent, 5);
        assert_eq!(snapshot.retry_count, 1);
    }

    #[tokio::test]
    async fn clones_share_counters_across_tasks() {
        let metrics = Metrics::new();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let metrics = metrics.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    metrics.record_success();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(metrics.rows_processed(), 800);
    }
}
