use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWrite;
use tokio::time::{Instant, MissedTickBehavior};

use super::WindowReport;
use crate::error::AppResult;
use crate::record::RecordSource;
use crate::streams::write_chunk;

/// What happens to the records folded since the last tick when the input
/// ends.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TailWindow {
    /// Emit one last snapshot.
    #[default]
    Flush,
    /// Drop the partial window silently.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub window: Duration,
    pub tail: TailWindow,
}

/// Counters describing one finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSummary {
    pub records: u64,
    pub flushes: u64,
}

/// Folds records from `source` into `report`, rendering a snapshot to
/// `output` every `options.window`.
///
/// The timer is polled before the decoder, so a due tick is never starved by
/// a source that always has data ready. Each snapshot reflects exactly the
/// records folded before it.
///
/// # Errors
///
/// Returns the first decode, format or write error.
pub async fn run_windowed<S, R, W>(
    source: &mut S,
    report: &mut R,
    output: &mut W,
    options: WindowOptions,
) -> AppResult<WindowSummary>
where
    S: RecordSource + ?Sized,
    R: WindowReport + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let start = Instant::now();
    let first_tick = start.checked_add(options.window).unwrap_or(start);
    let mut ticker = tokio::time::interval_at(first_tick, options.window);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut summary = WindowSummary::default();
    loop {
        tokio::select! {
            biased;
            _ = ticker.tick() => {
                flush_window(report, output).await?;
                summary.flushes = summary.flushes.saturating_add(1);
                tracing::debug!(
                    "Window {} flushed after {} records",
                    summary.flushes,
                    summary.records
                );
            }
            next = source.next_record() => match next? {
                Some(record) => {
                    report.fold(&record);
                    summary.records = summary.records.saturating_add(1);
                }
                None => break,
            },
        }
    }

    match options.tail {
        TailWindow::Flush => {
            flush_window(report, output).await?;
            summary.flushes = summary.flushes.saturating_add(1);
        }
        TailWindow::Discard => {
            tracing::debug!("Input ended; discarding the partial window");
        }
    }
    tracing::debug!(
        "Report finished: {} records, {} flushes",
        summary.records,
        summary.flushes
    );
    Ok(summary)
}

async fn flush_window<R, W>(report: &R, output: &mut W) -> AppResult<()>
where
    R: WindowReport + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let mut rendered = String::new();
    report.render(&mut rendered)?;
    write_chunk(output, rendered.as_bytes(), "report").await
}
