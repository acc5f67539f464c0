//! Result records and their wire encodings.
mod csv;
mod decoder;

#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub use csv::{format_csv_row, parse_csv_row};
pub use decoder::Decoder;

/// One request outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub code: u16,
    #[serde(with = "duration_nanos")]
    pub latency: Duration,
    pub bytes_out: u64,
    pub bytes_in: u64,
    #[serde(default)]
    pub error: String,
}

impl Record {
    /// Instant at which the request completed.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.latency)
            .ok()
            .and_then(|latency| self.timestamp.checked_add_signed(latency))
            .unwrap_or(self.timestamp)
    }

    #[must_use]
    pub fn latency_nanos(&self) -> u64 {
        u64::try_from(self.latency.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Encoding of a record stream.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Json,
    Csv,
}

/// A pull-based stream of records.
///
/// Implementations must be cancel-safe: dropping a pending `next_record`
/// future must not lose bytes, so the windowed loop can race it against the
/// flush timer.
#[async_trait]
pub trait RecordSource: Send {
    /// Returns the next record, `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed input and an I/O error when the
    /// underlying source fails.
    async fn next_record(&mut self) -> AppResult<Option<Record>>;
}

pub(crate) mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
