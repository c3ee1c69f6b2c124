use engine_core::context::run::RunContext;
use engine_processing::row::RowProcessor;
use futures::{StreamExt, stream};
use model::{
    prediction::outcome::PredictionOutcome,
    records::{customer::CustomerRecord, scored::ScoredRecord},
};
use tracing::{Instrument, debug};

/// Scores every record with at most `concurrency` requests in flight.
///
/// Results come back in input order regardless of completion order: each
/// future carries its slot index and lands in that slot.
pub async fn score_all(
    processor: &RowProcessor,
    records: Vec<CustomerRecord>,
    ctx: &RunContext,
    concurrency: usize,
) -> Vec<(ScoredRecord, PredictionOutcome)> {
    let total = records.len();
    let limit = concurrency.max(1);
    debug!(total, concurrency = limit, "Launching workers");

    let mut slots: Vec<Option<(ScoredRecord, PredictionOutcome)>> =
        std::iter::repeat_with(|| None).take(total).collect();

    let mut results = stream::iter(records.into_iter().enumerate())
        .map(|(slot, record)| {
            let span = ctx.span().clone();
            async move { (slot, processor.process(record, ctx, total).await) }.instrument(span)
        })
        .buffer_unordered(limit);

    while let Some((slot, scored)) = results.next().await {
        slots[slot] = Some(scored);
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::http::Predictor;
    use model::{
        core::value::{FieldValue, Value},
        prediction::{outcome::ChurnLabel, payload::RequestPayload},
    };
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    /// Answers slower for earlier rows so completion order is reversed.
    struct Staggered {
        total: u64,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Predictor for Staggered {
        async fn predict(&self, payload: &RequestPayload, _: &RunContext) -> PredictionOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let row = payload.customer["row"].as_u64().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis((self.total - row) * 10)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            PredictionOutcome::success(row as f64 / 10.0, ChurnLabel::No)
        }
    }

    fn records(n: usize) -> Vec<CustomerRecord> {
        (0..n)
            .map(|i| {
                let field = FieldValue::new("row", Value::Int(i as i64), i.to_string());
                CustomerRecord::new(i, vec![field])
            })
            .collect()
    }

    fn staggered(total: u64) -> Arc<Staggered> {
        Arc::new(Staggered {
            total,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn results_keep_input_order_under_concurrency() {
        let predictor = staggered(6);
        let processor = RowProcessor::new(predictor.clone());
        let ctx = RunContext::new("customers.csv");

        let scored = score_all(&processor, records(6), &ctx, 3).await;

        let order: Vec<usize> = scored.iter().map(|(row, _)| row.index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        let probabilities: Vec<f64> = scored.iter().filter_map(|(_, o)| o.probability()).collect();
        assert_eq!(probabilities, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]);

        let peak = predictor.peak.load(Ordering::SeqCst);
        assert!(peak > 1 && peak <= 3, "peak in-flight was {peak}");
    }

    #[tokio::test]
    async fn concurrency_of_one_is_sequential() {
        let predictor = staggered(4);
        let processor = RowProcessor::new(predictor.clone());
        let ctx = RunContext::new("customers.csv");

        let scored = score_all(&processor, records(4), &ctx, 1).await;

        assert_eq!(scored.len(), 4);
        assert_eq!(predictor.peak.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.metrics().rows_processed(), 4);
    }

    #[tokio::test]
    async fn no_records_no_work() {
        let processor = RowProcessor::new(staggered(0));
        let ctx = RunContext::new("customers.csv");
        assert!(score_all(&processor, Vec::new(), &ctx, 4).await.is_empty());
    }
}
