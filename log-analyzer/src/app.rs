use std::path::PathBuf;

use tracing::{info, warn};

use crate::{
    config::Config,
    error::AnalyzerResult,
    locator::LogLocator,
    logging::count,
    report::{already_generated, load_template, render, report_path, write_report},
    worker::analyze,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoLogFound,
    AlreadyGenerated(PathBuf),
    NoData,
    Written { path: PathBuf, rows: usize },
}

/// Locate, analyse and report the newest log under `config.log_dir`.
pub async fn run(config: &Config) -> AnalyzerResult<RunOutcome> {
    run_with(config, &LogLocator::default()).await
}

pub async fn run_with(config: &Config, locator: &LogLocator) -> AnalyzerResult<RunOutcome> {
    let Some(log) = locator.locate(&config.log_dir)? else {
        info!(dir = %config.log_dir.display(), "no log file to analyse");
        return Ok(RunOutcome::NoLogFound);
    };
    info!(log = %log.path.display(), date = %log.date, compressed = log.compressed, "found log");

    let path = report_path(&config.report_dir, log.date);
    if already_generated(&path).await? {
        info!(report = %path.display(), "report already generated");
        return Ok(RunOutcome::AlreadyGenerated(path));
    }
    let template = load_template(config.report_template.as_deref()).await?;

    let result = analyze(log, config.max_error_rate).await?;
    if result.is_empty() {
        warn!(lines = %count(result.total), "nothing to report");
        return Ok(RunOutcome::NoData);
    }

    let rows = result.top_rows(config.report_size);
    write_report(&path, &render(&template, &rows)?).await?;
    info!(report = %path.display(), rows = rows.len(), endpoints = result.endpoints.len(), "report ready");
    Ok(RunOutcome::Written {
        path,
        rows: rows.len(),
    })
}
