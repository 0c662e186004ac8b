use std::path::PathBuf;

use crate::invariants::{Endpoint, LogDate};

/// The newest rotated access log found in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLog {
    pub path: PathBuf,
    pub name: String,
    pub date: LogDate,
    pub compressed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub endpoint: Endpoint,
    pub request_time: f64,
}

/// Result of parsing one raw line. Malformed lines are data, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(ParsedRequest),
    Failed(String),
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}
