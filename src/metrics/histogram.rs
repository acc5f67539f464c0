use hdrhistogram::Histogram;

use crate::error::{AppError, AppResult, MetricsError};

/// Bounded-memory latency distribution in nanoseconds.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new auto-resizing histogram with three significant digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> AppResult<Self> {
        let hist = Histogram::<u64>::new(3).map_err(|err| {
            AppError::metrics(MetricsError::Histogram {
                context: "create latency histogram",
                source: Box::new(err),
            })
        })?;
        Ok(Self { hist })
    }

    /// Record a latency value in nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency_ns: u64) -> AppResult<()> {
        let value = latency_ns.max(1);
        self.hist.record(value).map_err(|err| {
            AppError::metrics(MetricsError::Histogram {
                context: "record latency",
                source: Box::new(err),
            })
        })
    }

    #[must_use]
    pub fn value_at_quantile(&self, quantile: f64) -> u64 {
        if self.count() == 0 {
            return 0;
        }
        self.hist.value_at_quantile(quantile)
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
