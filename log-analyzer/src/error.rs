use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "{failed} of {total} lines failed to parse ({:.2}%), allowed at most {:.2}%",
        .rate * 100.0,
        .max * 100.0
    )]
    QualityThreshold {
        failed: usize,
        total: usize,
        rate: f64,
        max: f64,
    },

    #[error("analysis cancelled")]
    Cancelled,

    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("cannot serialise report rows: {0}")]
    Render(#[from] serde_json::Error),
}

impl AnalyzerError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Io { .. } => 3,
            Self::QualityThreshold { .. } => 4,
            Self::Cancelled => 130,
            Self::Task(_) | Self::Render(_) => 1,
        }
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            AnalyzerError::Config("x".into()).exit_code(),
            AnalyzerError::io("/tmp/x", io::Error::other("boom")).exit_code(),
            AnalyzerError::QualityThreshold {
                failed: 1,
                total: 2,
                rate: 0.5,
                max: 0.0,
            }
            .exit_code(),
            AnalyzerError::Cancelled.exit_code(),
        ];
        let mut unique = codes.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_that!(unique).has_length(codes.len());
        assert!(codes.iter().all(|c| *c != 0));
    }

    #[test]
    fn quality_message_shows_percentages() {
        let err = AnalyzerError::QualityThreshold {
            failed: 5,
            total: 100,
            rate: 0.05,
            max: 0.01,
        };
        assert_eq!(
            err.to_string(),
            "5 of 100 lines failed to parse (5.00%), allowed at most 1.00%"
        );
    }
}
