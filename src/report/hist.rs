use super::WindowReport;
use crate::error::AppResult;
use crate::format::{TextTable, format_x100};
use crate::metrics::BucketHistogram;
use crate::record::Record;

/// Width of the bar for a bucket holding every record.
const BAR_WIDTH: u64 = 75;
/// Percentage scaled by 100, so `10_000` is 100%.
const PERCENT_X100: u64 = 10_000;
const COLUMN_PADDING: usize = 2;

/// Bucket table with count, percentage and a `#` bar per bucket.
#[derive(Debug)]
pub struct HistogramReport {
    histogram: BucketHistogram,
}

impl HistogramReport {
    #[must_use]
    pub const fn new(histogram: BucketHistogram) -> Self {
        Self { histogram }
    }
}

impl WindowReport for HistogramReport {
    fn fold(&mut self, record: &Record) {
        self.histogram.update(record);
    }

    fn render(&self, output: &mut String) -> AppResult<()> {
        let total = self.histogram.total();
        let buckets = self.histogram.buckets();
        let mut table = TextTable::new(COLUMN_PADDING);
        table.push_row(["Bucket", "", "#", "%", "Histogram"]);
        for (idx, count) in self.histogram.counts().iter().enumerate() {
            let Some((low, high)) = buckets.describe(idx) else {
                continue;
            };
            let percent_x100 = share(*count, total, PERCENT_X100);
            let bar_len = usize::try_from(share(*count, total, BAR_WIDTH)).unwrap_or(0);
            table.push_row([
                format!("[{},", low),
                format!("{}]", high),
                count.to_string(),
                format!("{}%", format_x100(percent_x100)),
                "#".repeat(bar_len),
            ]);
        }
        table.render_into(output)
    }
}

/// `count / total` scaled to `scale`, rounded down; zero for an empty total.
fn share(count: u64, total: u64, scale: u64) -> u64 {
    let scaled = u128::from(count)
        .saturating_mul(u128::from(scale))
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
