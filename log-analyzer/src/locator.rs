use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use tracing::{debug, trace};

use crate::{
    error::{AnalyzerError, AnalyzerResult},
    invariants::LogDate,
    models::LocatedLog,
};

/// Rotated nginx UI log: `nginx-access-ui.log-YYYYMMDD`, optionally gzipped.
pub static DEFAULT_LOG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^nginx-access-ui\.log-(?P<date>\d{8})(?P<gz>\.gz)?$").expect("valid log pattern")
});

/// Finds the newest rotated log in a directory.
///
/// The pattern must be anchored and expose a `date` group holding an 8-digit
/// `YYYYMMDD` token; a matched `gz` group marks the file as gzip-compressed.
#[derive(Debug, Clone)]
pub struct LogLocator {
    pattern: Regex,
}

impl Default for LogLocator {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_LOG_PATTERN.clone(),
        }
    }
}

impl LogLocator {
    pub fn with_pattern(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Returns `Ok(None)` when nothing in `dir` matches.
    ///
    /// When a plain and a gzipped file carry the same date the plain one wins.
    pub fn locate(&self, dir: &Path) -> AnalyzerResult<Option<LocatedLog>> {
        if !dir.is_dir() {
            return Err(AnalyzerError::Config(format!(
                "log directory {} does not exist or is not a directory",
                dir.display()
            )));
        }
        let entries = fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))?;

        let mut newest: Option<LocatedLog> = None;
        for entry in entries {
            let entry = entry.map_err(|e| AnalyzerError::io(dir, e))?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let Some(candidate) = self.match_name(&name, entry.path()) else {
                trace!(name = %name, "skipping non-matching file");
                continue;
            };
            if newest.as_ref().is_none_or(|best| rank(&candidate) > rank(best)) {
                newest = Some(candidate);
            }
        }

        debug!(dir = %dir.display(), found = ?newest.as_ref().map(|l| &l.name), "log lookup done");
        Ok(newest)
    }

    fn match_name(&self, name: &str, path: PathBuf) -> Option<LocatedLog> {
        let caps = self.pattern.captures(name)?;
        let date: LogDate = caps.name("date")?.as_str().parse().ok()?;
        Some(LocatedLog {
            path,
            name: name.to_string(),
            date,
            compressed: caps.name("gz").is_some(),
        })
    }
}

fn rank(log: &LocatedLog) -> (LogDate, bool, &str) {
    // Name last keeps the choice independent of listing order for custom patterns.
    (log.date, !log.compressed, log.name.as_str())
}
