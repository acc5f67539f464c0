use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, ReadBuf};

use super::BoxedSource;

/// What the fan-in does when the selected source reaches end of file.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceEofPolicy {
    /// End the merged stream as soon as any selected source is exhausted.
    #[default]
    Stop,
    /// Drop the exhausted source and keep reading the others.
    Skip,
}

/// Byte-level round-robin over several sources.
///
/// Every completed read is served by source `cursor % n`, after which the
/// cursor advances. Reads are not aligned to lines: a file fills as much of
/// the caller's buffer as it can (8 KiB through [`crate::record::Decoder`]),
/// so a line that straddles a read boundary is spliced with the next
/// source's bytes. Merged records decode cleanly only while every read ends
/// on a newline, as with line-buffered pipes or inputs smaller than one
/// read. A faster source can still dominate wall-clock throughput even
/// though read calls are spread evenly.
pub struct RoundRobinReader {
    sources: Vec<Option<BoxedSource>>,
    cursor: u64,
    live: usize,
    policy: SourceEofPolicy,
}

impl RoundRobinReader {
    #[must_use]
    pub fn new(sources: Vec<BoxedSource>, policy: SourceEofPolicy) -> Self {
        let live = sources.len();
        Self {
            sources: sources.into_iter().map(Some).collect(),
            cursor: 0,
            live,
            policy,
        }
    }

    /// Number of sources that have not reported end of file.
    #[must_use]
    pub const fn live_sources(&self) -> usize {
        self.live
    }

    fn selected(&self) -> usize {
        let len = u64::try_from(self.sources.len()).unwrap_or(u64::MAX).max(1);
        usize::try_from(self.cursor.checked_rem(len).unwrap_or(0)).unwrap_or(0)
    }

    const fn advance(&mut self) {
        self.cursor = self.cursor.wrapping_add(1);
    }
}

impl AsyncRead for RoundRobinReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }

        while this.live > 0 {
            let idx = this.selected();
            let Some(source) = this.sources.get_mut(idx).and_then(Option::as_mut) else {
                this.advance();
                continue;
            };

            let before = buf.filled().len();
            match Pin::new(source).poll_read(cx, buf) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(err)) => {
                    this.advance();
                    return Poll::Ready(Err(err));
                }
                Poll::Ready(Ok(())) => {
                    this.advance();
                    if buf.filled().len() > before {
                        return Poll::Ready(Ok(()));
                    }
                }
            }

            match this.policy {
                SourceEofPolicy::Stop => {
                    tracing::debug!("Input {} exhausted; ending merged stream", idx);
                    this.live = 0;
                }
                SourceEofPolicy::Skip => {
                    if let Some(slot) = this.sources.get_mut(idx) {
                        *slot = None;
                    }
                    this.live = this.live.saturating_sub(1);
                    tracing::debug!("Input {} exhausted; {} remaining", idx, this.live);
                }
            }
        }

        Poll::Ready(Ok(()))
    }
}
