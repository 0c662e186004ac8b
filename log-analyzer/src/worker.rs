use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

use crate::{
    analytics::{AggregationResult, StatsAggregator},
    error::AnalyzerResult,
    ingest::spawn_reader,
    logging::count,
    models::LocatedLog,
    parser::parse_line,
};

const INGEST_BUFFER_SIZE: usize = 8;
const AGGREGATOR_BUFFER_SIZE: usize = 4;

/// Parses each incoming batch into its own partial aggregate.
pub async fn worker_loop(mut rx: Receiver<Vec<String>>, tx: Sender<StatsAggregator>) {
    while let Some(batch) = rx.recv().await {
        let partial = StatsAggregator::from_outcomes(batch.iter().map(|line| parse_line(line)));
        if tx.send(partial).await.is_err() {
            break;
        }
    }
}

pub async fn aggregate(mut rx: Receiver<StatsAggregator>) -> StatsAggregator {
    let mut total = StatsAggregator::default();
    while let Some(partial) = rx.recv().await {
        total.merge(partial);
    }
    total
}

/// Runs reader, parser and aggregator over one log.
///
/// Dropping the returned future tears down the parse and aggregate stages;
/// the reader then fails its next send and closes the file.
pub async fn analyze(log: LocatedLog, max_error_rate: f64) -> AnalyzerResult<AggregationResult> {
    let name = log.name.clone();
    let (ingest_tx, ingest_rx) = mpsc::channel(INGEST_BUFFER_SIZE);
    let (aggregator_tx, aggregator_rx) = mpsc::channel(AGGREGATOR_BUFFER_SIZE);

    let reader = spawn_reader(log, ingest_tx);
    let ((), stats) = tokio::join!(
        worker_loop(ingest_rx, aggregator_tx),
        aggregate(aggregator_rx)
    );
    let read = reader.await??;

    info!(
        log = %name,
        lines = %count(read),
        failed = %count(stats.failed()),
        error_rate = stats.error_rate(),
        "log parsed"
    );
    if stats.failed() > 0 {
        warn!(failed = stats.failed(), "some lines did not match the log format");
    }
    stats.finish(max_error_rate)
}

/// Same fold without the runtime, for in-memory lines.
pub fn analyze_lines<I, S>(lines: I, max_error_rate: f64) -> AnalyzerResult<AggregationResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    StatsAggregator::from_outcomes(lines.into_iter().map(|line| parse_line(line.as_ref())))
        .finish(max_error_rate)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::AnalyzerError;
    use asserting::prelude::*;
    use flate2::{Compression, write::GzEncoder};
    use std::io::Write;

    fn line(path: &str, time: f64) -> String {
        format!(
            r#"1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET {path} HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" {time:.3}"#
        )
    }

    fn sample() -> Vec<String> {
        vec![
            line("/api/v1/x", 0.1),
            line("/api/v1/y", 1.0),
            line("/api/v1/x?page=2", 0.2),
            line("/api/v1/x", 0.3),
            line("/api/v1/y", 5.0),
        ]
    }

    #[test]
    fn analyze_lines_ranks_endpoints() {
        let rows = analyze_lines(sample(), 0.0).unwrap().top_rows(10);
        let names: Vec<_> = rows.iter().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(names, ["/api/v1/y", "/api/v1/x"]);
        assert_eq!(rows[1].count, 3);
    }

    #[test]
    fn analyze_lines_enforces_threshold() {
        let mut lines = sample();
        lines.push("broken".into());
        assert!(matches!(
            analyze_lines(&lines, 0.1),
            Err(AnalyzerError::QualityThreshold { .. })
        ));
        assert_that!(analyze_lines(&lines, 0.2)).is_ok();
    }

    #[test]
    fn analyze_lines_empty_is_ok() {
        let result = analyze_lines(Vec::<String>::new(), 0.0).unwrap();
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn analyze_gzipped_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nginx-access-ui.log-20170630.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::fast());
        for l in sample() {
            writeln!(enc, "{l}").unwrap();
        }
        std::fs::write(&path, enc.finish().unwrap()).unwrap();

        let log = LocatedLog {
            path,
            name: "nginx-access-ui.log-20170630.gz".into(),
            date: "20170630".parse().unwrap(),
            compressed: true,
        };
        let result = analyze(log, 0.0).await.unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(result.parsed, 5);
        assert_eq!(result.top_rows(1)[0].endpoint.as_str(), "/api/v1/y");
    }

    #[tokio::test]
    async fn analyze_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = LocatedLog {
            path: dir.path().join("nginx-access-ui.log-20170630"),
            name: "nginx-access-ui.log-20170630".into(),
            date: "20170630".parse().unwrap(),
            compressed: false,
        };
        assert!(matches!(
            analyze(log, 0.0).await,
            Err(AnalyzerError::Io { .. })
        ));
    }
}
