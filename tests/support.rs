use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use volley::record::Record;

/// Build a record `offset_ms` after a fixed base instant.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented.
pub fn record(offset_ms: i64, code: u16, latency_ms: u64, error: &str) -> Result<Record, String> {
    let base = Utc
        .timestamp_opt(1_700_000_000, 0)
        .single()
        .ok_or_else(|| "invalid base timestamp".to_owned())?;
    let timestamp = base
        .checked_add_signed(chrono::TimeDelta::milliseconds(offset_ms))
        .ok_or_else(|| format!("offset {}ms out of range", offset_ms))?;
    Ok(Record {
        timestamp,
        code,
        latency: Duration::from_millis(latency_ms),
        bytes_out: 20,
        bytes_in: 512,
        error: error.to_owned(),
    })
}

/// Encode records as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json_lines(records: &[Record]) -> Result<String, String> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|err| format!("encode failed: {}", err))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Write `content` to `name` inside `dir` and return the path as a string.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<String, String> {
    let path = dir.join(name);
    std::fs::write(&path, content).map_err(|err| format!("write {} failed: {}", name, err))?;
    Ok(path.to_string_lossy().into_owned())
}

/// Run the binary in `cwd`, optionally feeding `stdin`.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned or awaited.
pub fn run_volley<I, S>(cwd: &Path, args: I, stdin: Option<&[u8]>) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = volley_bin()?;
    let mut child = Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("VOLLEY_LOG", "error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("run volley failed: {}", err))?;

    // Dropping the pipe closes stdin even when there is nothing to send.
    if let (Some(mut pipe), Some(bytes)) = (child.stdin.take(), stdin) {
        pipe.write_all(bytes)
            .map_err(|err| format!("write stdin failed: {}", err))?;
    }

    child
        .wait_with_output()
        .map_err(|err| format!("wait volley failed: {}", err))
}

/// Fail with captured output unless the process succeeded.
///
/// # Errors
///
/// Returns an error describing the failed run.
pub fn expect_success(output: &Output) -> Result<String, String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    Err(format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    ))
}

fn volley_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_volley").map_or_else(
        || Err("CARGO_BIN_EXE_volley missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
