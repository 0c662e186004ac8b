use std::process::Command;

use asserting::prelude::*;
use log_analyzer::{locator::LogLocator, worker::analyze_lines};

#[test]
fn writes_a_log_the_analyzer_accepts() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_noise-maker"))
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "--date",
            "20170630",
            "--lines",
            "500",
            "--seed",
            "42",
        ])
        .status()
        .expect("Failed to start noise-maker");
    assert_that!(status.success()).is_true();

    let log = LogLocator::default()
        .locate(dir.path())
        .unwrap()
        .expect("generated log is located");
    assert_eq!(log.name, "nginx-access-ui.log-20170630");

    let body = std::fs::read_to_string(&log.path).unwrap();
    let result = analyze_lines(body.lines(), 0.0).unwrap();
    assert_eq!(result.total, 500);
    assert!(!result.top_rows(3).is_empty());
}

#[test]
fn rejects_invalid_date() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_noise-maker"))
        .args(["--dir", dir.path().to_str().unwrap(), "--date", "20170231"])
        .status()
        .expect("Failed to start noise-maker");
    assert_eq!(status.code(), Some(2));
}
