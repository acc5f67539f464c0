use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::record::{Record, duration_nanos};

/// Latency summary; durations serialize as integer nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LatencyMetrics {
    #[serde(with = "duration_nanos")]
    pub total: Duration,
    #[serde(with = "duration_nanos")]
    pub mean: Duration,
    #[serde(rename = "50th", with = "duration_nanos")]
    pub p50: Duration,
    #[serde(rename = "90th", with = "duration_nanos")]
    pub p90: Duration,
    #[serde(rename = "95th", with = "duration_nanos")]
    pub p95: Duration,
    #[serde(rename = "99th", with = "duration_nanos")]
    pub p99: Duration,
    #[serde(with = "duration_nanos")]
    pub min: Duration,
    #[serde(with = "duration_nanos")]
    pub max: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ByteMetrics {
    pub total: u64,
    pub mean: f64,
    /// `mean` scaled by 100 for fixed-point rendering.
    #[serde(skip)]
    pub mean_x100: u64,
}

/// Read-only view of everything folded so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsView {
    pub latencies: LatencyMetrics,
    pub bytes_in: ByteMetrics,
    pub bytes_out: ByteMetrics,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(with = "duration_nanos")]
    pub duration: Duration,
    #[serde(with = "duration_nanos")]
    pub wait: Duration,
    pub requests: u64,
    pub rate: f64,
    pub throughput: f64,
    pub success: f64,
    /// Requests per second scaled by 100.
    #[serde(skip)]
    pub rate_x100: u64,
    /// Successful requests per second scaled by 100.
    #[serde(skip)]
    pub throughput_x100: u64,
    /// Success percentage scaled by 100, so `10_000` is 100%.
    #[serde(skip)]
    pub success_x100: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub errors: Vec<String>,
}

/// Status codes counted as successful, e.g. `200-399`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRange(pub RangeInclusive<u16>);

impl StatusRange {
    /// A record succeeds when it carries no error text and its status code
    /// is inside the range.
    #[must_use]
    pub fn accepts(&self, record: &Record) -> bool {
        record.error.is_empty() && self.0.contains(&record.code)
    }
}

impl Default for StatusRange {
    fn default() -> Self {
        Self(200..=399)
    }
}

impl std::fmt::Display for StatusRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0.start(), self.0.end())
    }
}

impl std::str::FromStr for StatusRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let (start_str, end_str) = value.split_once('-').unwrap_or((value, value));
        if start_str.trim().is_empty() || end_str.trim().is_empty() {
            return Err(ValidationError::InvalidStatusRange {
                value: value.to_owned(),
            });
        }
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|err| ValidationError::InvalidStatusNumber {
                    value: value.to_owned(),
                    source: err,
                })
        };
        let start = parse(start_str)?;
        let end = parse(end_str)?;
        if start > end {
            return Err(ValidationError::StatusRangeStartAfterEnd);
        }
        Ok(StatusRange(start..=end))
    }
}
