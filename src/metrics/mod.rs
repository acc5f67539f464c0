//! Metrics aggregation: the running accumulator, fixed-bucket histograms,
//! and latency quantile stores.
mod accumulator;
mod buckets;
mod histogram;
mod quantiles;
mod types;

#[cfg(test)]
mod tests;

pub use accumulator::MetricsAccumulator;
pub use buckets::{BucketHistogram, Buckets};
pub use histogram::LatencyHistogram;
pub use quantiles::{Percentiles, QuantileMode};
pub use types::{ByteMetrics, LatencyMetrics, MetricsView, StatusRange};
