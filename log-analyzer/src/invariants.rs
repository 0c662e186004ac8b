use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use derive_more::{AsRef, Debug, Display};
use serde::Serialize;

/// Request path used as the aggregation key. Never empty, never carries a
/// query string.
#[derive(Debug, Display, AsRef, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or_default();
        if path.is_empty() {
            return Err(format!("no path in request target {s:?}"));
        }
        Ok(Self(path.to_string()))
    }
}

/// Calendar date encoded in a rotated log's file name as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogDate(NaiveDate);

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl LogDate {
    pub fn into_naive(self) -> NaiveDate {
        self.0
    }
}

impl FromStr for LogDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("{s:?} is not an 8-digit date"));
        }
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Self)
            .map_err(|e| format!("{s:?} is not a calendar date: {e}"))
    }
}
