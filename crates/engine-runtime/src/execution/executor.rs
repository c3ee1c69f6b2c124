use crate::{
    error::BatchError,
    execution::{batch_run::BatchRun, report::ReportEmitter, workers},
};
use connectors::{
    file::csv::{settings::CsvSettings, source::CsvDataSource},
    http::{Predictor, client::PredictionClient},
};
use engine_config::{
    report::summary::RunSummary,
    settings::{BatchSettings, paths::RunPaths},
};
use engine_core::context::run::RunContext;
use engine_processing::row::RowProcessor;
use std::sync::Arc;
use tracing::{Instrument, info};

/// Runs one batch against the HTTP prediction endpoint named in `settings`.
pub async fn run(settings: &BatchSettings, paths: &RunPaths) -> Result<RunSummary, BatchError> {
    settings.validate()?;
    let client = PredictionClient::new(
        settings.api_url.clone(),
        settings.timeout,
        settings.retry_policy(),
    )?;
    run_with(Arc::new(client), settings, paths).await
}

/// Runs one batch with any [`Predictor`].
pub async fn run_with(
    predictor: Arc<dyn Predictor>,
    settings: &BatchSettings,
    paths: &RunPaths,
) -> Result<RunSummary, BatchError> {
    settings.validate()?;
    BatchExecutor::new(predictor, settings.clone(), paths.clone())
        .execute()
        .await
}

struct BatchExecutor {
    processor: RowProcessor,
    settings: BatchSettings,
    paths: RunPaths,
    emitter: ReportEmitter,
}

impl BatchExecutor {
    fn new(predictor: Arc<dyn Predictor>, settings: BatchSettings, paths: RunPaths) -> Self {
        BatchExecutor {
            processor: RowProcessor::new(predictor),
            settings,
            paths,
            emitter: ReportEmitter::default(),
        }
    }

    async fn execute(self) -> Result<RunSummary, BatchError> {
        let ctx = RunContext::new(&self.paths.input)
            .with_progress_interval(self.settings.progress_interval);
        let span = ctx.span().clone();

        async move {
            info!(
                input = %self.paths.input.display(),
                output = %self.paths.output.display(),
                concurrency = self.settings.concurrency,
                "Starting batch processing"
            );

            let table = CsvDataSource::new(&self.paths.input, CsvSettings::default())
                .load()
                .map_err(BatchError::Input)?;
            let headers = table.headers();
            let total = table.len();
            info!(rows = total, columns = headers.len(), "Loaded customer records");

            let scored = workers::score_all(
                &self.processor,
                table.records,
                &ctx,
                self.settings.concurrency,
            )
            .await;

            let mut batch = BatchRun::with_capacity(total);
            for (row, outcome) in scored {
                batch.record(row, &outcome);
            }

            let timing = ctx.finish();
            let summary = RunSummary::new(
                &self.paths.input,
                &self.paths.output,
                batch.counts(),
                &timing,
            );

            self.emitter.emit(
                &headers,
                batch.rows(),
                &summary,
                &self.paths.output,
                &self.paths.summary,
            )?;

            info!(
                run_id = %summary.run_id,
                total = summary.total_customers,
                succeeded = summary.successful_predictions,
                failed = summary.failed_predictions,
                success_rate = summary.success_rate,
                average_probability = summary.statistics.average_probability,
                high_risk = summary.statistics.high_risk_count,
                medium_risk = summary.statistics.medium_risk_count,
                low_risk = summary.statistics.low_risk_count,
                duration_ms = summary.duration_ms,
                "Batch processing completed"
            );

            Ok::<_, BatchError>(summary)
        }
        .instrument(span)
        .await
    }
}
