use super::WindowReport;
use crate::error::AppResult;
use crate::format::{TextTable, format_duration, format_x100, write_line};
use crate::metrics::{MetricsAccumulator, MetricsView};
use crate::record::Record;

/// Two spaces between columns.
const COLUMN_PADDING: usize = 2;

/// Aligned, human-readable metrics block.
#[derive(Debug)]
pub struct TextReport {
    metrics: MetricsAccumulator,
}

impl TextReport {
    #[must_use]
    pub const fn new(metrics: MetricsAccumulator) -> Self {
        Self { metrics }
    }
}

impl WindowReport for TextReport {
    fn fold(&mut self, record: &Record) {
        self.metrics.update(record);
    }

    fn render(&self, output: &mut String) -> AppResult<()> {
        render_view(&self.metrics.snapshot(), output)
    }
}

pub(super) fn render_view(view: &MetricsView, output: &mut String) -> AppResult<()> {
    let latencies = &view.latencies;
    let mut table = TextTable::new(COLUMN_PADDING);
    table.push_row([
        "Requests".to_owned(),
        "[total, rate, throughput]".to_owned(),
        format!(
            "{}, {}, {}",
            view.requests,
            format_x100(view.rate_x100),
            format_x100(view.throughput_x100)
        ),
    ]);
    table.push_row([
        "Duration".to_owned(),
        "[total, attack, wait]".to_owned(),
        format!(
            "{}, {}, {}",
            format_duration(view.duration.saturating_add(view.wait)),
            format_duration(view.duration),
            format_duration(view.wait)
        ),
    ]);
    table.push_row([
        "Latencies".to_owned(),
        "[min, mean, 50, 90, 95, 99, max]".to_owned(),
        [
            latencies.min,
            latencies.mean,
            latencies.p50,
            latencies.p90,
            latencies.p95,
            latencies.p99,
            latencies.max,
        ]
        .into_iter()
        .map(format_duration)
        .collect::<Vec<_>>()
        .join(", "),
    ]);
    table.push_row([
        "Bytes In".to_owned(),
        "[total, mean]".to_owned(),
        format!("{}, {}", view.bytes_in.total, format_x100(view.bytes_in.mean_x100)),
    ]);
    table.push_row([
        "Bytes Out".to_owned(),
        "[total, mean]".to_owned(),
        format!("{}, {}", view.bytes_out.total, format_x100(view.bytes_out.mean_x100)),
    ]);
    table.push_row([
        "Success".to_owned(),
        "[ratio]".to_owned(),
        format!("{}%", format_x100(view.success_x100)),
    ]);
    table.push_row([
        "Status Codes".to_owned(),
        "[code:count]".to_owned(),
        view.status_codes
            .iter()
            .map(|(code, count)| format!("{}:{}", code, count))
            .collect::<Vec<_>>()
            .join("  "),
    ]);
    table.render_into(output)?;

    write_line(output, "Error Set:")?;
    for error in &view.errors {
        write_line(output, error)?;
    }
    Ok(())
}
