use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::args::parsers::parse_duration_literal;
use crate::error::ValidationError;
use crate::format::format_duration;
use crate::record::Record;

/// Strictly increasing, non-empty histogram boundaries.
///
/// Bucket `i` covers `[b_i, b_{i+1})`; the last bucket is open-ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets(Vec<Duration>);

impl Buckets {
    /// Validates and wraps a list of boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or not strictly increasing.
    pub fn new(bounds: Vec<Duration>) -> Result<Self, ValidationError> {
        if bounds.is_empty() {
            return Err(ValidationError::InvalidBuckets {
                value: "[]".to_owned(),
            });
        }
        if bounds.windows(2).any(|pair| matches!(pair, [lo, hi] if lo >= hi)) {
            return Err(ValidationError::BucketsNotIncreasing {
                value: Self(bounds).to_string(),
            });
        }
        Ok(Self(bounds))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a validated list.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the last boundary `<= latency`. Latencies below the first
    /// boundary land in bucket 0.
    #[must_use]
    pub fn classify(&self, latency: Duration) -> usize {
        self.0
            .partition_point(|bound| *bound <= latency)
            .saturating_sub(1)
    }

    /// Human-readable bounds of bucket `idx`, the last one ending at `+Inf`.
    #[must_use]
    pub fn describe(&self, idx: usize) -> Option<(String, String)> {
        let low = self.0.get(idx)?;
        let high = self
            .0
            .get(idx.saturating_add(1))
            .map_or_else(|| "+Inf".to_owned(), |bound| format_duration(*bound));
        Some((format_duration(*low), high))
    }
}

impl fmt::Display for Buckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|bound| format_duration(*bound)).collect();
        write!(f, "[{}]", parts.join(","))
    }
}

impl FromStr for Buckets {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let inner = value
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| ValidationError::InvalidBuckets {
                value: value.to_owned(),
            })?;
        if inner.trim().is_empty() {
            return Err(ValidationError::InvalidBuckets {
                value: value.to_owned(),
            });
        }

        let bounds = inner
            .split(',')
            .map(|part| {
                parse_duration_literal(part).map_err(|err| ValidationError::InvalidBucketDuration {
                    value: value.to_owned(),
                    source: Box::new(err),
                })
            })
            .collect::<Result<Vec<Duration>, ValidationError>>()?;

        Self::new(bounds).map_err(|err| {
            if matches!(err, ValidationError::BucketsNotIncreasing { .. }) {
                ValidationError::BucketsNotIncreasing {
                    value: value.to_owned(),
                }
            } else {
                err
            }
        })
    }
}

/// Fixed-bucket latency counter.
#[derive(Debug, Clone)]
pub struct BucketHistogram {
    buckets: Buckets,
    counts: Vec<u64>,
    total: u64,
}

impl BucketHistogram {
    #[must_use]
    pub fn new(buckets: Buckets) -> Self {
        let counts = vec![0; buckets.len()];
        Self {
            buckets,
            counts,
            total: 0,
        }
    }

    pub fn update(&mut self, record: &Record) {
        let idx = self.buckets.classify(record.latency);
        if let Some(count) = self.counts.get_mut(idx) {
            *count = count.saturating_add(1);
            self.total = self.total.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    #[must_use]
    pub const fn counts(&self) -> &[u64] {
        self.counts.as_slice()
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }
}
