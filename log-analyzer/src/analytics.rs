use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::{
    error::{AnalyzerError, AnalyzerResult},
    invariants::Endpoint,
    models::{ParseOutcome, ParsedRequest},
};

/// Running request-time state for one endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointStats {
    count: usize,
    time_sum: f64,
    time_values: Vec<f64>,
}

impl EndpointStats {
    pub fn record(&mut self, request_time: f64) {
        self.count += 1;
        self.time_sum += request_time;
        self.time_values.push(request_time);
    }

    pub fn merge(&mut self, other: EndpointStats) {
        self.count += other.count;
        self.time_sum += other.time_sum;
        self.time_values.extend(other.time_values);
    }

    pub fn count(&self) -> usize {
        self.count
    }
    pub fn time_sum(&self) -> f64 {
        self.time_sum
    }
    pub fn time_values(&self) -> &[f64] {
        &self.time_values
    }

    pub fn time_max(&self) -> f64 {
        self.time_values.iter().copied().fold(0.0, f64::max)
    }

    pub fn time_avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.time_sum / self.count as f64
        }
    }

    pub fn time_med(&self) -> f64 {
        median(&self.time_values)
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Single-pass fold over parse outcomes.
///
/// Partial aggregators built over disjoint batches can be combined with
/// [`StatsAggregator::merge`]; every field is order-independent.
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    total: usize,
    failed: usize,
    time_total: f64,
    endpoints: HashMap<Endpoint, EndpointStats>,
}

impl StatsAggregator {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = ParseOutcome>) -> Self {
        let mut aggregator = Self::default();
        for outcome in outcomes {
            aggregator.fold(outcome);
        }
        aggregator
    }

    pub fn fold(&mut self, outcome: ParseOutcome) {
        self.total += 1;
        match outcome {
            ParseOutcome::Parsed(ParsedRequest {
                endpoint,
                request_time,
            }) => {
                self.time_total += request_time;
                self.endpoints
                    .entry(endpoint)
                    .or_default()
                    .record(request_time);
            }
            ParseOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: StatsAggregator) {
        self.total += other.total;
        self.failed += other.failed;
        self.time_total += other.time_total;
        for (endpoint, stats) in other.endpoints {
            self.endpoints.entry(endpoint).or_default().merge(stats);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn error_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failed as f64 / self.total as f64
        }
    }

    /// Closes the fold. Fails when the share of unparsed lines is above
    /// `max_error_rate`.
    pub fn finish(self, max_error_rate: f64) -> AnalyzerResult<AggregationResult> {
        let rate = self.error_rate();
        if rate > max_error_rate {
            return Err(AnalyzerError::QualityThreshold {
                failed: self.failed,
                total: self.total,
                rate,
                max: max_error_rate,
            });
        }
        Ok(AggregationResult {
            total: self.total,
            parsed: self.total - self.failed,
            time_total: self.time_total,
            endpoints: self.endpoints,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    pub total: usize,
    pub parsed: usize,
    pub time_total: f64,
    pub endpoints: HashMap<Endpoint, EndpointStats>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Rows for the `n` endpoints with the largest cumulative time, heaviest
    /// first. Equal sums are ordered by endpoint.
    pub fn top_rows(&self, n: usize) -> Vec<ReportRow> {
        let mut entries: Vec<_> = self.endpoints.iter().collect();
        entries.sort_unstable_by(|(ea, a), (eb, b)| {
            b.time_sum
                .total_cmp(&a.time_sum)
                .then_with(|| ea.cmp(eb))
        });
        entries.truncate(n);
        entries
            .into_iter()
            .map(|(endpoint, stats)| self.row(endpoint, stats))
            .collect()
    }

    fn row(&self, endpoint: &Endpoint, stats: &EndpointStats) -> ReportRow {
        ReportRow {
            endpoint: endpoint.clone(),
            count: stats.count,
            count_percent: percent(stats.count as f64, self.parsed as f64),
            time_sum: stats.time_sum,
            time_percent: percent(stats.time_sum, self.time_total),
            time_avg: stats.time_avg(),
            time_max: stats.time_max(),
            time_med: stats.time_med(),
        }
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

/// One report line. Serialised floats are rounded to three decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "url")]
    pub endpoint: Endpoint,
    pub count: usize,
    #[serde(rename = "count_perc", serialize_with = "round3")]
    pub count_percent: f64,
    #[serde(serialize_with = "round3")]
    pub time_sum: f64,
    #[serde(rename = "time_perc", serialize_with = "round3")]
    pub time_percent: f64,
    #[serde(serialize_with = "round3")]
    pub time_avg: f64,
    #[serde(serialize_with = "round3")]
    pub time_max: f64,
    #[serde(serialize_with = "round3")]
    pub time_med: f64,
}

fn round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}
