use crate::http::{Predictor, error::ClientError};
use async_trait::async_trait;
use engine_core::{context::run::RunContext, retry::RetryPolicy};
use model::prediction::{
    outcome::{ChurnLabel, PredictionOutcome},
    payload::{ErrorResponse, PredictionResponse, RequestPayload},
};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the prediction endpoint.
///
/// Each call sends the payload as JSON with a per-attempt timeout. Transport
/// failures are retried according to the configured [`RetryPolicy`]; the
/// default policy makes a single attempt.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl PredictionClient {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(PredictionClient {
            client,
            url: url.into(),
            retry,
        })
    }

    /// Scores one payload. Never fails; errors become
    /// [`PredictionOutcome::Failure`].
    pub async fn call(&self, payload: &RequestPayload, ctx: &RunContext) -> PredictionOutcome {
        let retried = self
            .retry
            .run(|| self.send(payload), |err: &ClientError| err.retry_disposition())
            .await;

        ctx.metrics().increment_requests(retried.attempts as u64);
        if retried.retries() > 0 {
            ctx.metrics().increment_retries(retried.retries() as u64);
            debug!(attempts = retried.attempts, "Prediction request retried");
        }

        match retried.result {
            Ok((probability, label)) => PredictionOutcome::success(probability, label),
            Err(err) => err.into_inner().into_outcome(),
        }
    }

    /// One attempt against the endpoint.
    async fn send(&self, payload: &RequestPayload) -> Result<(f64, ChurnLabel), ClientError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let err = ClientError::transport(&e);
                warn!(url = %self.url, error = %err, "Prediction request failed");
                err
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(&e))?;

        if status != StatusCode::OK {
            let detail = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(|b| b.error);
            warn!(
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "API request failed with status {}",
                status.as_u16()
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        parse_prediction(&body)
    }
}

#[async_trait]
impl Predictor for PredictionClient {
    async fn predict(&self, payload: &RequestPayload, ctx: &RunContext) -> PredictionOutcome {
        self.call(payload, ctx).await
    }
}

/// Validates a 200 body: a probability in [0, 1] and a `Yes`/`No` label.
pub fn parse_prediction(body: &[u8]) -> Result<(f64, ChurnLabel), ClientError> {
    let response: PredictionResponse =
        serde_json::from_slice(body).map_err(|e| ClientError::InvalidBody(e.to_string()))?;

    let probability = response.churn_probability;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(ClientError::InvalidBody(format!(
            "churn_probability {probability} is outside [0, 1]"
        )));
    }

    let label = response
        .churn_prediction
        .parse::<ChurnLabel>()
        .map_err(|e| ClientError::InvalidBody(e.to_string()))?;

    Ok((probability, label))
}
