use std::time::Duration;

use chrono::{DateTime, Utc};

use super::Record;
use crate::error::{DecodeError, ReportError};

/// Formats a record as `timestampNanos,code,latencyNanos,bytesOut,bytesIn,"error"`.
///
/// # Errors
///
/// Returns an error when the timestamp does not fit in signed 64-bit
/// nanoseconds since the Unix epoch (years before 1677 or after 2262).
pub fn format_csv_row(record: &Record) -> Result<String, ReportError> {
    let nanos = record
        .timestamp
        .timestamp_nanos_opt()
        .ok_or(ReportError::TimestampOutOfRange {
            timestamp: record.timestamp,
        })?;
    Ok(format!(
        "{},{},{},{},{},\"{}\"\n",
        nanos,
        record.code,
        record.latency_nanos(),
        record.bytes_out,
        record.bytes_in,
        record.error.replace('"', "\"\"")
    ))
}

/// Parses one CSV dump row. The error column may be omitted.
///
/// # Errors
///
/// Returns a decode error when the row has the wrong shape or a numeric
/// column does not parse.
pub fn parse_csv_row(row: &str, line: u64) -> Result<Record, DecodeError> {
    let row = row.trim_end_matches(['\r', '\n']);
    let parts: Vec<&str> = row.splitn(6, ',').collect();
    let [timestamp, code, latency, bytes_out, bytes_in, rest @ ..] = parts.as_slice() else {
        return Err(DecodeError::CsvColumnCount {
            line,
            found: parts.len(),
        });
    };

    let nanos: i64 = parse_field(timestamp, "timestamp", line)?;
    let code: u16 = parse_field(code, "code", line)?;
    let latency: u64 = parse_field(latency, "latency", line)?;
    let bytes_out: u64 = parse_field(bytes_out, "bytes_out", line)?;
    let bytes_in: u64 = parse_field(bytes_in, "bytes_in", line)?;
    let error = rest
        .first()
        .map(|field| unquote(field, line))
        .transpose()?
        .unwrap_or_default();

    Ok(Record {
        timestamp: DateTime::<Utc>::from_timestamp_nanos(nanos),
        code,
        latency: Duration::from_nanos(latency),
        bytes_out,
        bytes_in,
        error,
    })
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    line: u64,
) -> Result<T, DecodeError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_err| DecodeError::InvalidCsvField {
            line,
            field,
            value: value.to_owned(),
        })
}

fn unquote(field: &str, line: u64) -> Result<String, DecodeError> {
    let Some(inner) = field.strip_prefix('"') else {
        return Ok(field.to_owned());
    };
    let Some(inner) = inner.strip_suffix('"') else {
        return Err(DecodeError::UnterminatedCsvQuote { line });
    };
    Ok(inner.replace("\"\"", "\""))
}
