//! Text formatting shared by the reporters.
use std::fmt::Write as _;
use std::time::Duration;

use crate::error::{AppError, AppResult, ReportError};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const SECS_PER_MIN: u128 = 60;
const SECS_PER_HOUR: u128 = 3_600;

/// Formats a duration as `0s`, `850ns`, `1.5µs`, `12.25ms`, `3s` or `1h2m3.5s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{}ns", nanos);
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}\u{b5}s", format_fraction(nanos, NANOS_PER_MICRO, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", format_fraction(nanos, NANOS_PER_MILLI, 6));
    }

    let total_secs = nanos.checked_div(NANOS_PER_SEC).unwrap_or(0);
    let sub_nanos = nanos.checked_rem(NANOS_PER_SEC).unwrap_or(0);
    let hours = total_secs.checked_div(SECS_PER_HOUR).unwrap_or(0);
    let minutes = total_secs
        .checked_rem(SECS_PER_HOUR)
        .and_then(|rem| rem.checked_div(SECS_PER_MIN))
        .unwrap_or(0);
    let secs = total_secs.checked_rem(SECS_PER_MIN).unwrap_or(0);
    let secs_nanos = secs.saturating_mul(NANOS_PER_SEC).saturating_add(sub_nanos);
    let secs_text = format_fraction(secs_nanos, NANOS_PER_SEC, 9);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, secs_text)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, secs_text)
    } else {
        format!("{}s", secs_text)
    }
}

/// Renders `value / unit` as a decimal with at most `width` fraction digits
/// and no trailing zeros.
pub(crate) fn format_fraction(value: u128, unit: u128, width: usize) -> String {
    let whole = value.checked_div(unit).unwrap_or(0);
    let frac = value.checked_rem(unit).unwrap_or(0);
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Renders a value scaled by 100 with two decimals, e.g. `1250` as `12.50`.
#[must_use]
pub fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

/// Appends one line to a report buffer.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line)
        .map_err(|err| AppError::report(ReportError::WriteLine { source: err }))
}

/// Column-aligned text, in the manner of an elastic tabstop writer.
///
/// Cells in the same column are left-aligned and padded to the widest cell
/// plus `padding` spaces. The last cell of a row is never padded.
#[derive(Debug, Default)]
pub struct TextTable {
    rows: Vec<Vec<String>>,
    padding: usize,
}

impl TextTable {
    #[must_use]
    pub const fn new(padding: usize) -> Self {
        Self {
            rows: Vec::new(),
            padding,
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Renders all rows and clears the table.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn render_into(&mut self, output: &mut String) -> AppResult<()> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            let padded_cells = row.len().saturating_sub(1);
            for (idx, cell) in row.iter().take(padded_cells).enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(idx) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }

        for row in std::mem::take(&mut self.rows) {
            let mut line = String::new();
            let last = row.len().saturating_sub(1);
            for (idx, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if idx < last {
                    let width = widths.get(idx).copied().unwrap_or(0);
                    let fill = width
                        .saturating_sub(cell.chars().count())
                        .saturating_add(self.padding);
                    line.extend(std::iter::repeat_n(' ', fill));
                }
            }
            write_line(output, &line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations_like_go() -> Result<(), String> {
        let cases = [
            (Duration::ZERO, "0s"),
            (Duration::from_nanos(850), "850ns"),
            (Duration::from_nanos(1_500), "1.5\u{b5}s"),
            (Duration::from_millis(100), "100ms"),
            (Duration::from_micros(12_250), "12.25ms"),
            (Duration::from_secs(3), "3s"),
            (Duration::from_millis(1_500), "1.5s"),
            (Duration::from_secs(90), "1m30s"),
            (Duration::from_secs(3_600), "1h0m0s"),
            (Duration::from_millis(3_723_500), "1h2m3.5s"),
        ];
        for (duration, expected) in cases {
            let formatted = format_duration(duration);
            if formatted != expected {
                return Err(format!("{:?}: expected {}, got {}", duration, expected, formatted));
            }
        }
        Ok(())
    }

    #[test]
    fn table_aligns_columns() -> Result<(), String> {
        let mut table = TextTable::new(2);
        table.push_row(["Requests", "[total]", "3"]);
        table.push_row(["Bytes In", "[total, mean]", "10, 3.33"]);
        let mut out = String::new();
        table
            .render_into(&mut out)
            .map_err(|err| format!("render failed: {}", err))?;
        let expected = "Requests  [total]        3\nBytes In  [total, mean]  10, 3.33\n";
        if out == expected {
            Ok(())
        } else {
            Err(format!("Unexpected table:\n{}", out))
        }
    }
}
