use crate::args::{Cli, Command, StreamArgs, parse_inputs};
use crate::error::AppResult;
use crate::report::{ReportSettings, WindowOptions};

use super::types::{RunPlan, StreamPlan};

pub(in crate::entry) fn build_plan(cli: Cli) -> AppResult<RunPlan> {
    match cli.command {
        Command::Report(args) => Ok(RunPlan::Report {
            reporter: args.reporter,
            settings: ReportSettings {
                window: WindowOptions {
                    window: args.window,
                    tail: args.final_window,
                },
                quantiles: args.quantiles,
                success_status: args.success_status,
            },
            streams: stream_plan(args.streams)?,
        }),
        Command::Dump(args) => Ok(RunPlan::Dump {
            dumper: args.dumper,
            streams: stream_plan(args.streams)?,
        }),
    }
}

fn stream_plan(args: StreamArgs) -> AppResult<StreamPlan> {
    Ok(StreamPlan {
        inputs: parse_inputs(&args.inputs)?,
        output: args.output,
        format: args.input_format,
        on_source_eof: args.on_source_eof,
    })
}
