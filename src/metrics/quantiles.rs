use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::LatencyHistogram;
use crate::error::AppResult;

/// How latency percentiles are computed.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuantileMode {
    /// Keep every sample; exact nearest-rank percentiles.
    #[default]
    Exact,
    /// HDR histogram; bounded memory, three significant digits.
    Hdr,
}

/// Latency percentiles in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Percentiles {
    pub p50: u64,
    pub p90: u64,
    pub p95: u64,
    pub p99: u64,
}

#[derive(Debug, Clone)]
pub(crate) enum QuantileStore {
    Exact(Vec<u64>),
    Hdr(LatencyHistogram),
}

impl QuantileStore {
    pub(crate) fn new(mode: QuantileMode) -> AppResult<Self> {
        match mode {
            QuantileMode::Exact => Ok(Self::Exact(Vec::new())),
            QuantileMode::Hdr => Ok(Self::Hdr(LatencyHistogram::new()?)),
        }
    }

    pub(crate) fn record(&mut self, latency_ns: u64) {
        match self {
            Self::Exact(samples) => samples.push(latency_ns),
            Self::Hdr(histogram) => {
                if let Err(err) = histogram.record(latency_ns) {
                    tracing::warn!("Dropping latency sample {}ns: {}", latency_ns, err);
                }
            }
        }
    }

    pub(crate) fn percentiles(&self) -> Percentiles {
        match self {
            Self::Exact(samples) => {
                if samples.is_empty() {
                    return Percentiles::default();
                }
                let mut sorted = samples.clone();
                sorted.sort_unstable();
                Percentiles {
                    p50: percentile(&sorted, 50),
                    p90: percentile(&sorted, 90),
                    p95: percentile(&sorted, 95),
                    p99: percentile(&sorted, 99),
                }
            }
            Self::Hdr(histogram) => Percentiles {
                p50: histogram.value_at_quantile(0.50),
                p90: histogram.value_at_quantile(0.90),
                p95: histogram.value_at_quantile(0.95),
                p99: histogram.value_at_quantile(0.99),
            },
        }
    }
}

/// Nearest-rank percentile over sorted data.
fn percentile(sorted: &[u64], percentile: u64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let count = u64::try_from(sorted.len().saturating_sub(1)).unwrap_or(u64::MAX);
    let index = percentile
        .saturating_mul(count)
        .saturating_add(50)
        .checked_div(100)
        .unwrap_or(0);
    let idx = usize::try_from(index).unwrap_or_else(|_| sorted.len().saturating_sub(1));
    *sorted.get(idx).unwrap_or(&0)
}
