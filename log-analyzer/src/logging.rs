use std::{fs::OpenOptions, path::Path, sync::Mutex};

use num_format::{Locale, ToFormattedString};
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// level. With a `log_file` events are appended there instead of stderr.
pub fn init_logging(log_file: Option<&Path>) -> AnalyzerResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AnalyzerError::io(path, e))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    }
    .map_err(|e| AnalyzerError::Config(format!("cannot install logger: {e}")))
}

/// `1234567` -> `1,234,567`, for line counts in log messages.
pub fn count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_separators() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1_234_567), "1,234,567");
    }
}
