use std::process::ExitCode;

use clap::Parser;
use log_analyzer::{
    app::{self, RunOutcome},
    config::{Args, Config},
    error::AnalyzerError,
    logging::init_logging,
};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = match Config::load(args) {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(None);
            error!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };
    if let Err(e) = init_logging(config.log_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }

    let result = tokio::select! {
        result = app::run(&config) => result,
        Ok(()) = signal::ctrl_c() => Err(AnalyzerError::Cancelled),
    };

    match result {
        Ok(RunOutcome::Written { path, rows }) => {
            info!(report = %path.display(), rows, "done");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            info!(?outcome, "done, no report written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "log analysis failed");
            ExitCode::from(e.exit_code())
        }
    }
}
