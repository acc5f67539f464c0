use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::quantiles::{QuantileMode, QuantileStore};
use super::types::{ByteMetrics, LatencyMetrics, MetricsView, StatusRange};
use crate::error::AppResult;
use crate::record::Record;

const NANOS_PER_SEC: u128 = 1_000_000_000;
const PERCENT_SCALE: u128 = 100;
const SUCCESS_RATE_SCALE: u128 = 10_000;

/// Running aggregate over every record folded so far.
///
/// Never reset: each snapshot covers the full history.
#[derive(Debug, Clone)]
pub struct MetricsAccumulator {
    requests: u64,
    successes: u64,
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    bytes_in: u64,
    bytes_out: u64,
    latency_sum_ns: u128,
    min_latency_ns: u64,
    max_latency_ns: u64,
    status_codes: BTreeMap<u16, u64>,
    errors: Vec<String>,
    seen_errors: HashSet<String>,
    quantiles: QuantileStore,
    success_status: StatusRange,
}

impl MetricsAccumulator {
    /// # Errors
    ///
    /// Returns an error if the HDR quantile store cannot be created.
    pub fn new(mode: QuantileMode, success_status: StatusRange) -> AppResult<Self> {
        Ok(Self {
            requests: 0,
            successes: 0,
            earliest: None,
            latest: None,
            end: None,
            bytes_in: 0,
            bytes_out: 0,
            latency_sum_ns: 0,
            min_latency_ns: u64::MAX,
            max_latency_ns: 0,
            status_codes: BTreeMap::new(),
            errors: Vec::new(),
            seen_errors: HashSet::new(),
            quantiles: QuantileStore::new(mode)?,
            success_status,
        })
    }

    pub fn update(&mut self, record: &Record) {
        self.requests = self.requests.saturating_add(1);
        self.bytes_in = self.bytes_in.saturating_add(record.bytes_in);
        self.bytes_out = self.bytes_out.saturating_add(record.bytes_out);

        let count = self.status_codes.entry(record.code).or_insert(0);
        *count = count.saturating_add(1);

        if self.earliest.is_none_or(|earliest| record.timestamp < earliest) {
            self.earliest = Some(record.timestamp);
        }
        if self.latest.is_none_or(|latest| record.timestamp > latest) {
            self.latest = Some(record.timestamp);
        }
        let end = record.end();
        if self.end.is_none_or(|current| end > current) {
            self.end = Some(end);
        }

        if self.success_status.accepts(record) {
            self.successes = self.successes.saturating_add(1);
        }
        if !record.error.is_empty() && self.seen_errors.insert(record.error.clone()) {
            self.errors.push(record.error.clone());
        }

        let latency_ns = record.latency_nanos();
        self.latency_sum_ns = self.latency_sum_ns.saturating_add(u128::from(latency_ns));
        self.min_latency_ns = self.min_latency_ns.min(latency_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
        self.quantiles.record(latency_ns);
    }

    #[must_use]
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsView {
        if self.requests == 0 {
            return MetricsView::default();
        }

        let duration = span(self.earliest, self.latest);
        let wait = span(self.latest, self.end);
        let duration_ns = duration.as_nanos();
        let total_ns = duration.saturating_add(wait).as_nanos();
        let requests = u128::from(self.requests);
        let successes = u128::from(self.successes);

        // A single instant has no spread; its rate is the request count.
        let (rate, rate_x100) = if duration_ns == 0 {
            (ratio(requests, 1), scaled(requests, 1, PERCENT_SCALE))
        } else {
            (
                ratio(requests.saturating_mul(NANOS_PER_SEC), duration_ns),
                scaled(requests.saturating_mul(NANOS_PER_SEC), duration_ns, PERCENT_SCALE),
            )
        };
        let throughput_rate = successes.saturating_mul(NANOS_PER_SEC);

        let mean_ns = self.latency_sum_ns.checked_div(requests).unwrap_or(0);
        let percentiles = self.quantiles.percentiles();

        MetricsView {
            latencies: LatencyMetrics {
                total: nanos(self.latency_sum_ns),
                mean: nanos(mean_ns),
                p50: Duration::from_nanos(percentiles.p50),
                p90: Duration::from_nanos(percentiles.p90),
                p95: Duration::from_nanos(percentiles.p95),
                p99: Duration::from_nanos(percentiles.p99),
                min: Duration::from_nanos(self.min_latency_ns),
                max: Duration::from_nanos(self.max_latency_ns),
            },
            bytes_in: byte_metrics(self.bytes_in, requests),
            bytes_out: byte_metrics(self.bytes_out, requests),
            earliest: self.earliest,
            latest: self.latest,
            end: self.end,
            duration,
            wait,
            requests: self.requests,
            rate,
            throughput: ratio(throughput_rate, total_ns),
            success: ratio(successes, requests),
            rate_x100,
            throughput_x100: scaled(throughput_rate, total_ns, PERCENT_SCALE),
            success_x100: scaled(successes, requests, SUCCESS_RATE_SCALE),
            status_codes: self.status_codes.clone(),
            errors: self.errors.clone(),
        }
    }
}

fn span(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Duration {
    match (from, to) {
        (Some(from), Some(to)) => to.signed_duration_since(from).to_std().unwrap_or_default(),
        _ => Duration::ZERO,
    }
}

fn byte_metrics(total: u64, requests: u128) -> ByteMetrics {
    ByteMetrics {
        total,
        mean: ratio(u128::from(total), requests),
        mean_x100: scaled(u128::from(total), requests, PERCENT_SCALE),
    }
}

/// `numerator * scale / denominator` in fixed point; zero when the
/// denominator is zero.
fn scaled(numerator: u128, denominator: u128, scale: u128) -> u64 {
    let value = numerator
        .saturating_mul(scale)
        .checked_div(denominator)
        .unwrap_or(0);
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[expect(
    clippy::float_arithmetic,
    reason = "JSON reports carry fractional rates and ratios"
)]
const fn ratio(numerator: u128, denominator: u128) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

fn nanos(value: u128) -> Duration {
    Duration::from_nanos(u64::try_from(value).unwrap_or(u64::MAX))
}
