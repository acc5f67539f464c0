use std::path::PathBuf;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::{AppError, AppResult, ReportError};

/// Input name that selects standard input.
pub const STDIN: &str = "stdin";
/// Output name that selects standard output.
pub const STDOUT: &str = "stdout";

pub type BoxedSource = Box<dyn AsyncRead + Unpin + Send>;
pub type BoxedSink = Box<dyn AsyncWrite + Unpin + Send>;

/// Opens every named input, in order.
///
/// # Errors
///
/// Returns an error if any file cannot be opened. Files opened before the
/// failure are closed when the partial list is dropped.
pub async fn open_inputs(names: &[String]) -> AppResult<Vec<BoxedSource>> {
    let mut sources: Vec<BoxedSource> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name == STDIN {
            sources.push(Box::new(tokio::io::stdin()));
            continue;
        }
        let file = tokio::fs::File::open(name).await.map_err(|err| {
            AppError::report(ReportError::OpenInput {
                path: PathBuf::from(name),
                source: err,
            })
        })?;
        tracing::debug!("Opened input {}", name);
        sources.push(Box::new(file));
    }
    Ok(sources)
}

/// Opens the output destination, truncating an existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub async fn open_output(name: &str) -> AppResult<BoxedSink> {
    let name = name.trim();
    if name == STDOUT {
        return Ok(Box::new(tokio::io::stdout()));
    }
    let file = tokio::fs::File::create(name).await.map_err(|err| {
        AppError::report(ReportError::CreateOutput {
            path: PathBuf::from(name),
            source: err,
        })
    })?;
    Ok(Box::new(file))
}

/// Writes a rendered chunk and flushes it through to the destination.
///
/// # Errors
///
/// Returns an error if the write or the flush fails.
pub async fn write_chunk<W>(output: &mut W, chunk: &[u8], context: &'static str) -> AppResult<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    output
        .write_all(chunk)
        .await
        .map_err(|err| AppError::report(ReportError::Write { context, source: err }))?;
    flush_output(output, context).await
}

/// # Errors
///
/// Returns an error if the flush fails.
pub async fn flush_output<W>(output: &mut W, context: &'static str) -> AppResult<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    output
        .flush()
        .await
        .map_err(|err| AppError::report(ReportError::Write { context, source: err }))
}
