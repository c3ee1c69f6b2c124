use crate::{commands::RunArgs, env::EnvManager, error::CliError, shutdown::ExitCode};
use clap::Parser;
use engine_config::report::summary::RunSummary;
use engine_runtime::execution::executor;
use tracing::{error, info};

mod commands;
mod env;
mod error;
mod logging;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "churn-batch",
    version,
    about = "Batch customer churn prediction processing"
)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.args.log_file);

    let code = tokio::select! {
        result = run(cli.args) => match result {
            Ok(_) => ExitCode::Success,
            Err(err) => {
                error!(error = %err, "Batch processing failed");
                println!("Error: {err}");
                ExitCode::GeneralError
            }
        },
        _ = shutdown::wait_for_signal() => {
            error!("{}", CliError::ShutdownRequested);
            ExitCode::ShutdownRequested
        }
    };

    code.into()
}

async fn run(args: RunArgs) -> Result<RunSummary, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = &args.env_file {
        env.load_from_file(path)?;
        info!(path = %path.display(), "Loaded environment file");
    }

    let settings = args.settings(env.all())?;
    let paths = args.paths(chrono::Local::now());
    info!(
        api_url = %settings.api_url,
        timeout_secs = settings.timeout.as_secs(),
        max_attempts = settings.max_attempts,
        "Batch processing environment initialized"
    );

    let summary = executor::run(&settings, &paths).await?;
    output::print_summary(&summary, &paths.summary);
    Ok(summary)
}
