use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use super::WindowSummary;
use crate::error::{AppError, AppResult, ReportError};
use crate::format::format_fraction;
use crate::metrics::StatusRange;
use crate::record::{Record, RecordSource};
use crate::streams::{flush_output, write_chunk};

/// Canvas renderer embedded into every page.
const PLOT_SCRIPT: &str = include_str!("assets/plot.js");
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Writes a self-contained HTML page plotting every record's latency.
///
/// Points are `[seconds_elapsed, err_ms, ok_ms]` with `NaN` in the column
/// that does not apply. Elapsed time is signed and measured from the first
/// record, so earlier records from merged inputs plot left of zero.
///
/// # Errors
///
/// Returns the first decode or write error.
pub async fn run_plot<S, W>(
    source: &mut S,
    success_status: &StatusRange,
    output: &mut W,
) -> AppResult<WindowSummary>
where
    S: RecordSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let mut writer = BufWriter::new(output);
    write_chunk(&mut writer, PLOT_HEAD.as_bytes(), "plot header").await?;
    write_chunk(&mut writer, PLOT_SCRIPT.as_bytes(), "plot script").await?;
    write_chunk(&mut writer, PLOT_DATA_OPEN.as_bytes(), "plot header").await?;

    let mut summary = WindowSummary::default();
    let mut origin: Option<DateTime<Utc>> = None;
    let mut point = String::new();
    while let Some(record) = source.next_record().await? {
        let first = *origin.get_or_insert(record.timestamp);
        point.clear();
        if summary.records > 0 {
            point.push(',');
        }
        format_point(&mut point, &record, first, success_status)?;
        writer.write_all(point.as_bytes()).await.map_err(|err| {
            AppError::report(ReportError::Write {
                context: "plot point",
                source: err,
            })
        })?;
        summary.records = summary.records.saturating_add(1);
    }

    write_chunk(&mut writer, PLOT_TAIL.as_bytes(), "plot footer").await?;
    flush_output(&mut writer, "plot").await?;
    summary.flushes = 1;
    tracing::debug!("Plotted {} records", summary.records);
    Ok(summary)
}

fn format_point(
    point: &mut String,
    record: &Record,
    origin: DateTime<Utc>,
    success_status: &StatusRange,
) -> AppResult<()> {
    let elapsed = format_elapsed(origin, record.timestamp);
    let latency_ms = format_fraction(u128::from(record.latency_nanos()), NANOS_PER_MILLI, 6);
    let result = if success_status.accepts(record) {
        write!(point, "[{},NaN,{}]", elapsed, latency_ms)
    } else {
        write!(point, "[{},{},NaN]", elapsed, latency_ms)
    };
    result.map_err(|err| AppError::report(ReportError::WriteLine { source: err }))
}

/// Signed decimal seconds from `origin` to `at`, e.g. `-0.25`.
fn format_elapsed(origin: DateTime<Utc>, at: DateTime<Utc>) -> String {
    let (sign, magnitude) = if at < origin {
        ("-", origin.signed_duration_since(at))
    } else {
        ("", at.signed_duration_since(origin))
    };
    let nanos = magnitude.to_std().map_or(0, |elapsed| elapsed.as_nanos());
    format!("{}{}", sign, format_fraction(nanos, NANOS_PER_SEC, 9))
}

const PLOT_HEAD: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Volley Plot</title>
</head>
<body>
  <canvas id="latencies" style="display: block; width: 100%; height: 600px"></canvas>
  <button id="download">Download as PNG</button>
  <script>
"#;

const PLOT_DATA_OPEN: &str = r#"
  </script>
  <script>
  volleyPlot(
    document.getElementById("latencies"),
    ["#;

const PLOT_TAIL: &str = r#"],
    {
      title: 'Volley Plot',
      labels: ['Seconds', 'ERR', 'OK'],
      ylabel: 'Latency (ms)',
      xlabel: 'Seconds elapsed',
      colors: ['#FA7878', '#8AE234'],
      strokeWidth: 1.3
    }
  );
  document.getElementById("download").addEventListener("click", function() {
    var canvas = document.getElementById("latencies");
    var a = document.createElement("a");
    a.setAttribute("download", "volley-plot.png");
    a.setAttribute("href", canvas.toDataURL("image/png"));
    a.click();
  });
  </script>
</body>
</html>
"#;
