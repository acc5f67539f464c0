use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use super::{Record, RecordFormat, RecordSource, parse_csv_row};
use crate::error::{AppError, AppResult, DecodeError};

/// Pulls records one line at a time from a byte stream.
///
/// The pending line lives in the decoder rather than in the read future,
/// so a cancelled `next_record` resumes where it stopped.
pub struct Decoder<R> {
    reader: BufReader<R>,
    format: RecordFormat,
    pending: Vec<u8>,
    line: u64,
}

impl<R> Decoder<R>
where
    R: AsyncRead + Unpin + Send,
{
    #[must_use]
    pub fn new(reader: R, format: RecordFormat) -> Self {
        Self {
            reader: BufReader::new(reader),
            format,
            pending: Vec::new(),
            line: 0,
        }
    }

    /// Number of lines consumed so far, blank lines included.
    #[must_use]
    pub const fn lines_read(&self) -> u64 {
        self.line
    }

    async fn read_record(&mut self) -> AppResult<Option<Record>> {
        loop {
            self.reader
                .read_until(b'\n', &mut self.pending)
                .await
                .map_err(|err| {
                    AppError::decode(DecodeError::Io {
                        line: self.line.saturating_add(1),
                        source: err,
                    })
                })?;
            if self.pending.is_empty() {
                return Ok(None);
            }

            self.line = self.line.saturating_add(1);
            let raw = std::mem::take(&mut self.pending);
            let trimmed = trim_line(&raw);
            if trimmed.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return self.parse(trimmed).map(Some).map_err(AppError::decode);
        }
    }

    fn parse(&self, line: &[u8]) -> Result<Record, DecodeError> {
        match self.format {
            RecordFormat::Json => {
                serde_json::from_slice(line).map_err(|err| DecodeError::InvalidJson {
                    line: self.line,
                    source: err,
                })
            }
            RecordFormat::Csv => {
                let text = std::str::from_utf8(line)
                    .map_err(|_err| DecodeError::InvalidUtf8 { line: self.line })?;
                parse_csv_row(text, self.line)
            }
        }
    }
}

#[async_trait]
impl<R> RecordSource for Decoder<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn next_record(&mut self) -> AppResult<Option<Record>> {
        self.read_record().await
    }
}

fn trim_line(raw: &[u8]) -> &[u8] {
    let without_lf = raw.strip_suffix(b"\n").unwrap_or(raw);
    without_lf.strip_suffix(b"\r").unwrap_or(without_lf)
}
