use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "noise-maker")]
#[command(about = "Write fake rotated nginx UI access logs for testing", long_about = None)]
pub struct CliArgs {
    #[arg(long, default_value = "./log")]
    dir: PathBuf,

    /// Date stamped into the file name, YYYYMMDD. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    #[arg(long, default_value_t = 10000)]
    lines: usize,

    #[arg(long, default_value_t = false)]
    gzip: bool,

    /// Share of lines written in a shape the analyzer must reject.
    #[arg(long, default_value_t = 0.0)]
    malformed_rate: f64,

    #[arg(long)]
    seed: Option<u64>,
}
