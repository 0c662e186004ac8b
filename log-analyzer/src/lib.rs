//! Finds the newest rotated nginx UI access log, aggregates request time per
//! endpoint and renders the heaviest endpoints into an HTML report.

pub mod analytics;
pub mod app;
pub mod config;
pub mod decoder;
pub mod error;
pub mod ingest;
pub mod invariants;
pub mod locator;
pub mod logging;
pub mod models;
pub mod parser;
pub mod report;
pub mod worker;
