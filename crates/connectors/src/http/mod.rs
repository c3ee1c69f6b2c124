pub mod client;
pub mod error;

use async_trait::async_trait;
use engine_core::context::run::RunContext;
use model::prediction::{outcome::PredictionOutcome, payload::RequestPayload};

/// Anything that turns a request payload into a prediction outcome.
///
/// Implementations never fail: every error is folded into
/// [`PredictionOutcome::Failure`].
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, payload: &RequestPayload, ctx: &RunContext) -> PredictionOutcome;
}
