//! Windowed reporters: periodic text, JSON and histogram snapshots, plus the
//! one-shot HTML latency plot.
mod hist;
mod json;
mod plot;
mod text;
mod window;


use std::fmt;
use std::str::FromStr;

use tokio::io::AsyncWrite;

use crate::error::{AppResult, ValidationError};
use crate::metrics::{BucketHistogram, Buckets, MetricsAccumulator, QuantileMode, StatusRange};
use crate::record::{Record, RecordSource};

pub use hist::HistogramReport;
pub use json::JsonReport;
pub use plot::run_plot;
pub use text::TextReport;
pub use window::{TailWindow, WindowOptions, WindowSummary, run_windowed};

const HIST_PREFIX: &str = "hist";

/// A reporter flavor: folds records and renders a snapshot on demand.
pub trait WindowReport: Send {
    fn fold(&mut self, record: &Record);

    /// Renders everything folded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be formatted.
    fn render(&self, output: &mut String) -> AppResult<()>;
}

/// Reporter selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterKind {
    Text,
    Json,
    Plot,
    Histogram(Buckets),
}

impl FromStr for ReporterKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "plot" => Ok(Self::Plot),
            other => other.strip_prefix(HIST_PREFIX).map_or_else(
                || {
                    Err(ValidationError::UnsupportedReporter {
                        value: other.to_owned(),
                    })
                },
                |bounds| bounds.parse().map(Self::Histogram),
            ),
        }
    }
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
            Self::Plot => f.write_str("plot"),
            Self::Histogram(buckets) => write!(f, "{}{}", HIST_PREFIX, buckets),
        }
    }
}

/// Settings shared by every reporter flavor.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub window: WindowOptions,
    pub quantiles: QuantileMode,
    pub success_status: StatusRange,
}

/// Runs the selected reporter until the source is exhausted.
///
/// # Errors
///
/// Returns decode, metrics and write errors as soon as they occur.
pub async fn run_report<S, W>(
    kind: ReporterKind,
    settings: &ReportSettings,
    source: &mut S,
    output: &mut W,
) -> AppResult<WindowSummary>
where
    S: RecordSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    match kind {
        ReporterKind::Text => {
            let mut report = TextReport::new(MetricsAccumulator::new(
                settings.quantiles,
                settings.success_status.clone(),
            )?);
            run_windowed(source, &mut report, output, settings.window).await
        }
        ReporterKind::Json => {
            let mut report = JsonReport::new(MetricsAccumulator::new(
                settings.quantiles,
                settings.success_status.clone(),
            )?);
            run_windowed(source, &mut report, output, settings.window).await
        }
        ReporterKind::Histogram(buckets) => {
            let mut report = HistogramReport::new(BucketHistogram::new(buckets));
            run_windowed(source, &mut report, output, settings.window).await
        }
        ReporterKind::Plot => run_plot(source, &settings.success_status, output).await,
    }
}
