use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::dump::DumperKind;
use crate::metrics::{QuantileMode, StatusRange};
use crate::record::RecordFormat;
use crate::report::{ReporterKind, TailWindow};
use crate::streams::{SourceEofPolicy, STDIN, STDOUT};

use super::parsers::parse_duration_arg;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "volley",
    version,
    arg_required_else_help = true,
    about = "Streaming reports for load-test results - windowed text/JSON summaries, latency histograms, CSV/JSON dumps, and HTML latency plots."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a volley.toml or volley.json config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Aggregate records into periodic reports
    Report(ReportArgs),
    /// Re-emit every record as CSV or JSON
    Dump(DumpArgs),
}

/// Input and output options shared by both subcommands.
#[derive(Debug, Args, Clone)]
pub struct StreamArgs {
    /// Input files, comma separated; `stdin` reads standard input
    #[arg(long, default_value = STDIN)]
    pub inputs: String,

    /// Output file; `stdout` writes to standard output
    #[arg(long, default_value = STDOUT)]
    pub output: String,

    /// Encoding of the input records
    #[arg(long = "input-format", value_enum, default_value_t = RecordFormat::Json)]
    pub input_format: RecordFormat,

    /// What to do when one of several inputs runs dry
    #[arg(long = "on-source-eof", value_enum, default_value_t = SourceEofPolicy::Stop)]
    pub on_source_eof: SourceEofPolicy,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Reporter: text, json, plot, or hist[buckets] (e.g., hist[0,100ms,1s])
    #[arg(long, default_value = "text")]
    pub reporter: ReporterKind,

    /// Report window (supports ns/us/ms/s/m/h and compounds like 1m30s)
    #[arg(long, default_value = "1s", value_parser = parse_duration_arg)]
    pub window: Duration,

    /// Whether the partial window is reported when input ends
    #[arg(long = "final-window", value_enum, default_value_t = TailWindow::Flush)]
    pub final_window: TailWindow,

    /// Status codes counted as successful (e.g., 200-399)
    #[arg(long = "success-status", default_value = "200-399")]
    pub success_status: StatusRange,

    /// Percentile computation: exact samples or a bounded HDR histogram
    #[arg(long, value_enum, default_value_t = QuantileMode::Exact)]
    pub quantiles: QuantileMode,

    #[command(flatten)]
    pub streams: StreamArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DumpArgs {
    /// Dumper: json or csv
    #[arg(long, default_value = "json")]
    pub dumper: DumperKind,

    #[command(flatten)]
    pub streams: StreamArgs,
}
