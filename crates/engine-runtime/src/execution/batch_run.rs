use engine_config::report::summary::RunCounts;
use model::{prediction::outcome::PredictionOutcome, records::scored::ScoredRecord};

/// Aggregate of a run, filled by a single writer in input order.
///
/// `rows` and `probabilities` are append-only; probabilities are collected
/// for successful rows only.
#[derive(Debug, Default)]
pub struct BatchRun {
    rows: Vec<ScoredRecord>,
    probabilities: Vec<f64>,
    succeeded: u64,
}

impl BatchRun {
    pub fn with_capacity(rows: usize) -> Self {
        BatchRun {
            rows: Vec::with_capacity(rows),
            probabilities: Vec::with_capacity(rows),
            succeeded: 0,
        }
    }

    pub fn record(&mut self, scored: ScoredRecord, outcome: &PredictionOutcome) {
        if let Some(probability) = outcome.probability() {
            self.succeeded += 1;
            self.probabilities.push(probability);
        }
        self.rows.push(scored);
    }

    pub fn total(&self) -> u64 {
        self.rows.len() as u64
    }

    pub fn rows(&self) -> &[ScoredRecord] {
        &self.rows
    }

    pub fn counts(&self) -> RunCounts<'_> {
        RunCounts {
            total: self.total(),
            succeeded: self.succeeded,
            probabilities: &self.probabilities,
        }
    }
}
