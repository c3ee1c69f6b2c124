use serde::Serialize;

/// Probabilities at or above this are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
/// Probabilities at or above this (and below high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBucket {
    High,
    Medium,
    Low,
}

impl RiskBucket {
    pub fn of(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskBucket::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskBucket::Medium
        } else {
            RiskBucket::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PredictionStatistics {
    pub average_probability: f64,
    pub high_risk_count: u64,
    pub medium_risk_count: u64,
    pub low_risk_count: u64,
}

impl PredictionStatistics {
    pub fn bucketed(&self) -> u64 {
        self.high_risk_count + self.medium_risk_count + self.low_risk_count
    }
}

/// Reduces the probabilities of successful predictions. Order does not
/// matter; an empty slice yields all zeros.
pub fn summarize(samples: &[f64]) -> PredictionStatistics {
    let mut stats = PredictionStatistics::default();
    if samples.is_empty() {
        return stats;
    }

    for &probability in samples {
        match RiskBucket::of(probability) {
            RiskBucket::High => stats.high_risk_count += 1,
            RiskBucket::Medium => stats.medium_risk_count += 1,
            RiskBucket::Low => stats.low_risk_count += 1,
        }
    }
    stats.average_probability = samples.iter().sum::<f64>() / samples.len() as f64;
    stats
}
