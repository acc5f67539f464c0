//! Record dumpers: re-emit every decoded record as CSV rows or JSON lines.

use std::fmt;
use std::str::FromStr;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::error::{AppError, AppResult, ReportError, ValidationError};
use crate::record::{Record, RecordSource, format_csv_row};
use crate::streams::flush_output;

/// Output encoding of the dump command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumperKind {
    #[default]
    Json,
    Csv,
}

impl FromStr for DumperKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ValidationError::UnsupportedDumper {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DumperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// Copies every record from `source` to `output` in the chosen encoding.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns the first decode, serialization or write error.
pub async fn run_dump<S, W>(kind: DumperKind, source: &mut S, output: &mut W) -> AppResult<u64>
where
    S: RecordSource + ?Sized,
    W: AsyncWrite + Unpin + Send + ?Sized,
{
    let mut writer = BufWriter::new(output);
    let mut written: u64 = 0;
    while let Some(record) = source.next_record().await? {
        let line = encode(kind, &record)?;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|err| {
                AppError::report(ReportError::Write {
                    context: "dump record",
                    source: err,
                })
            })?;
        written = written.saturating_add(1);
    }
    flush_output(&mut writer, "dump").await?;
    tracing::debug!("Dumped {} records as {}", written, kind);
    Ok(written)
}

fn encode(kind: DumperKind, record: &Record) -> AppResult<String> {
    match kind {
        DumperKind::Csv => format_csv_row(record).map_err(AppError::report),
        DumperKind::Json => {
            let mut line = serde_json::to_string(record).map_err(|err| {
                AppError::report(ReportError::Serialize {
                    context: "record",
                    source: err,
                })
            })?;
            line.push('\n');
            Ok(line)
        }
    }
}
