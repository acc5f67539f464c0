use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{AppError, AppResult};

use super::Record;

pub(crate) fn base_time() -> AppResult<DateTime<Utc>> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .ok_or_else(|| AppError::validation("Invalid base timestamp"))
}

pub(crate) fn record_at(
    offset_ms: u64,
    code: u16,
    latency_ms: u64,
    error: &str,
) -> AppResult<Record> {
    let offset = chrono::TimeDelta::milliseconds(
        i64::try_from(offset_ms).map_err(|_err| AppError::validation("Offset too large"))?,
    );
    let timestamp = base_time()?
        .checked_add_signed(offset)
        .ok_or_else(|| AppError::validation("Offset out of range"))?;
    Ok(Record {
        timestamp,
        code,
        latency: Duration::from_millis(latency_ms),
        bytes_out: 10,
        bytes_in: 100,
        error: error.to_owned(),
    })
}

pub(crate) fn json_lines(records: &[Record]) -> AppResult<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.push(b'\n');
    }
    Ok(out)
}
