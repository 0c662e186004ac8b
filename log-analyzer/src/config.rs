use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::Deserialize;

use crate::error::{AnalyzerError, AnalyzerResult};

pub const DEFAULT_REPORT_SIZE: usize = 1000;
pub const DEFAULT_REPORT_DIR: &str = "./reports";
pub const DEFAULT_LOG_DIR: &str = "./log";
pub const DEFAULT_MAX_ERROR_RATE: f64 = 0.0;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Ranks nginx endpoints by request time", long_about = None)]
pub struct Args {
    /// TOML file with settings; CLI flags take precedence over it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    #[arg(long)]
    pub report_size: Option<usize>,

    /// Largest tolerated share of unparsable lines, between 0 and 1.
    #[arg(long)]
    pub max_error_rate: Option<f64>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long)]
    pub report_template: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(alias = "REPORT_SIZE")]
    report_size: Option<usize>,
    #[serde(alias = "REPORT_DIR")]
    report_dir: Option<PathBuf>,
    #[serde(alias = "LOG_DIR")]
    log_dir: Option<PathBuf>,
    max_error_rate: Option<f64>,
    log_file: Option<PathBuf>,
    report_template: Option<PathBuf>,
}

impl FileConfig {
    fn from_file(path: &Path) -> AnalyzerResult<Self> {
        if !path.is_file() {
            return Err(AnalyzerError::Config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| {
            AnalyzerError::Config(format!("cannot parse config {}: {e}", path.display()))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub report_size: usize,
    pub report_dir: PathBuf,
    pub log_dir: PathBuf,
    pub max_error_rate: f64,
    pub log_file: Option<PathBuf>,
    pub report_template: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: DEFAULT_REPORT_SIZE,
            report_dir: DEFAULT_REPORT_DIR.into(),
            log_dir: DEFAULT_LOG_DIR.into(),
            max_error_rate: DEFAULT_MAX_ERROR_RATE,
            log_file: None,
            report_template: None,
        }
    }
}

impl Config {
    /// Defaults, then the config file named by `--config`, then CLI flags.
    pub fn load(args: Args) -> AnalyzerResult<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let defaults = Self::default();
        let config = Self {
            report_size: args
                .report_size
                .or(file.report_size)
                .unwrap_or(defaults.report_size),
            report_dir: args
                .report_dir
                .or(file.report_dir)
                .unwrap_or(defaults.report_dir),
            log_dir: args.log_dir.or(file.log_dir).unwrap_or(defaults.log_dir),
            max_error_rate: args
                .max_error_rate
                .or(file.max_error_rate)
                .unwrap_or(defaults.max_error_rate),
            log_file: args.log_file.or(file.log_file),
            report_template: args.report_template.or(file.report_template),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AnalyzerResult<()> {
        if self.report_size == 0 {
            return Err(AnalyzerError::Config("report_size must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.max_error_rate) {
            return Err(AnalyzerError::Config(format!(
                "max_error_rate must be within 0..=1, got {}",
                self.max_error_rate
            )));
        }
        Ok(())
    }
}
