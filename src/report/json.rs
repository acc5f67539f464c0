use super::WindowReport;
use crate::error::{AppError, AppResult, ReportError};
use crate::format::write_line;
use crate::metrics::MetricsAccumulator;
use crate::record::Record;

/// One `MetricsView` JSON object per line.
#[derive(Debug)]
pub struct JsonReport {
    metrics: MetricsAccumulator,
}

impl JsonReport {
    #[must_use]
    pub const fn new(metrics: MetricsAccumulator) -> Self {
        Self { metrics }
    }
}

impl WindowReport for JsonReport {
    fn fold(&mut self, record: &Record) {
        self.metrics.update(record);
    }

    fn render(&self, output: &mut String) -> AppResult<()> {
        let line = serde_json::to_string(&self.metrics.snapshot()).map_err(|err| {
            AppError::report(ReportError::Serialize {
                context: "metrics snapshot",
                source: err,
            })
        })?;
        write_line(output, &line)
    }
}
