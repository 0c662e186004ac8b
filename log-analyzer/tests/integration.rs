use std::{fs, io::Write, path::Path};

use asserting::prelude::*;
use flate2::{Compression, write::GzEncoder};
use tokio::process::Command;

fn line(path: &str, time: f64) -> String {
    format!(
        r#"1.169.137.128 -  - [29/Jun/2017:03:50:23 +0300] "GET {path} HTTP/1.1" 200 1020 "-" "Configovod" "-" "1498697423-2118016444-4708-9752773" "712e90144abee9" {time:.3}"#
    )
}

fn write_gz(path: &Path, lines: &[String]) {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    for l in lines {
        writeln!(enc, "{l}").unwrap();
    }
    fs::write(path, enc.finish().unwrap()).unwrap();
}

async fn run_analyzer(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_log-analyzer"))
        .args(args)
        .output()
        .await
        .expect("Failed to start log-analyzer")
}

#[tokio::test]
async fn log_analyzer_reports_newest_log() {
    let root = tempfile::tempdir().unwrap();
    let log_dir = root.path().join("log");
    let report_dir = root.path().join("reports");
    fs::create_dir_all(&log_dir).unwrap();

    // Older plain log must be ignored in favour of the newer gzipped one.
    fs::write(
        log_dir.join("nginx-access-ui.log-20170629"),
        line("/old", 9.0) + "\n",
    )
    .unwrap();
    let lines: Vec<String> = (0..30)
        .map(|i| line(&format!("/api/v2/slot/{}", i % 3), 0.1 * (i % 3 + 1) as f64))
        .collect();
    write_gz(&log_dir.join("nginx-access-ui.log-20170630.gz"), &lines);

    let output = run_analyzer(&[
        "--log-dir",
        log_dir.to_str().unwrap(),
        "--report-dir",
        report_dir.to_str().unwrap(),
        "--report-size",
        "2",
    ])
    .await;
    assert_that!(output.status.success()).is_true();

    let html = fs::read_to_string(report_dir.join("report-2017.06.30.html")).unwrap();
    assert!(html.contains("/api/v2/slot/2"));
    assert!(html.contains("/api/v2/slot/1"));
    assert!(!html.contains("/api/v2/slot/0"));
    assert!(!html.contains("/old"));
    assert!(!html.contains("$table_json"));
}

#[tokio::test]
async fn log_analyzer_exit_codes() {
    let root = tempfile::tempdir().unwrap();
    let log_dir = root.path().join("log");
    fs::create_dir_all(&log_dir).unwrap();
    let report_dir = root.path().join("reports");
    let base = [
        "--log-dir",
        log_dir.to_str().unwrap(),
        "--report-dir",
        report_dir.to_str().unwrap(),
    ];

    // Nothing to analyse is a clean exit.
    let output = run_analyzer(&base).await;
    assert_eq!(output.status.code(), Some(0));

    // Missing log directory.
    let missing = root.path().join("missing");
    let output = run_analyzer(&["--log-dir", missing.to_str().unwrap()]).await;
    assert_eq!(output.status.code(), Some(2));

    // Too many malformed lines.
    fs::write(
        log_dir.join("nginx-access-ui.log-20170630"),
        format!("{}\ngarbage\n", line("/a", 0.5)),
    )
    .unwrap();
    let output = run_analyzer(&base).await;
    assert_eq!(output.status.code(), Some(4));
    assert_that!(report_dir.exists()).is_false();

    // Same input passes with a looser ceiling.
    let mut loose = base.to_vec();
    loose.extend(["--max-error-rate", "0.5"]);
    let output = run_analyzer(&loose).await;
    assert_eq!(output.status.code(), Some(0));
    assert_that!(report_dir.join("report-2017.06.30.html").exists()).is_true();
}
