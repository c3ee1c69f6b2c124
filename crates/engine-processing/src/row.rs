use crate::transform::mapping::RequestMapper;
use connectors::http::Predictor;
use engine_core::context::run::RunContext;
use model::{
    prediction::outcome::PredictionOutcome,
    records::{customer::CustomerRecord, scored::ScoredRecord},
};
use std::sync::Arc;
use tracing::{error, info};

/// Scores a single record: maps it, asks the predictor, and merges the outcome
/// back into the record.
///
/// Processing is total over the outcome. A failed prediction still yields a
/// well-formed [`ScoredRecord`] with empty prediction cells and the error
/// message filled in.
#[derive(Clone)]
pub struct RowProcessor {
    mapper: RequestMapper,
    predictor: Arc<dyn Predictor>,
}

impl RowProcessor {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        RowProcessor {
            mapper: RequestMapper::new(),
            predictor,
        }
    }

    /// Returns the scored record and the outcome it was built from.
    pub async fn process(
        &self,
        record: CustomerRecord,
        ctx: &RunContext,
        total_rows: usize,
    ) -> (ScoredRecord, PredictionOutcome) {
        let payload = self.mapper.map(&record);
        let outcome = self.predictor.predict(&payload, ctx).await;

        match &outcome {
            PredictionOutcome::Success { probability, label } => {
                ctx.metrics().record_success();
                info!(
                    row = record.index,
                    probability = *probability,
                    prediction = %label,
                    "Successfully processed customer at row {}",
                    record.index
                );
            }
            PredictionOutcome::Failure {
                error_message,
                error_kind,
            } => {
                ctx.metrics().record_failure(*error_kind);
                error!(
                    row = record.index,
                    error_kind = error_kind.code(),
                    error = %error_message,
                    "Failed to process customer at row {}",
                    record.index
                );
            }
        }
        ctx.row_finished(total_rows);

        (ScoredRecord::new(record, &outcome), outcome)
    }
}
