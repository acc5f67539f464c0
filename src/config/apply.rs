use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{Cli, Command, DumpArgs, ReportArgs, StreamArgs, parse_duration_literal};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue, InputsValue};

/// Applies configuration values to every flag the command line left at its
/// default.
///
/// # Errors
///
/// Returns an error when a config value does not parse.
pub fn apply_config(cli: &mut Cli, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        cli.verbose = verbose;
    }
    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        cli.no_color = no_color;
    }

    match &mut cli.command {
        Command::Report(args) => {
            let sub = matches.subcommand_matches("report").unwrap_or(matches);
            apply_report(args, sub, config)
        }
        Command::Dump(args) => {
            let sub = matches.subcommand_matches("dump").unwrap_or(matches);
            apply_dump(args, sub, config)
        }
    }
}

fn apply_report(args: &mut ReportArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "reporter")
        && let Some(reporter) = config.reporter.as_deref()
    {
        args.reporter = reporter.parse().map_err(|err| invalid("reporter", err))?;
    }

    if !is_cli(matches, "window")
        && let Some(window) = config.window.as_ref()
    {
        args.window = window_duration(window).map_err(|err| invalid("window", err))?;
    }

    if !is_cli(matches, "final_window")
        && let Some(final_window) = config.final_window
    {
        args.final_window = final_window;
    }

    if !is_cli(matches, "success_status")
        && let Some(status) = config.success_status.as_deref()
    {
        args.success_status = status.parse().map_err(|err| invalid("success_status", err))?;
    }

    if !is_cli(matches, "quantiles")
        && let Some(quantiles) = config.quantiles
    {
        args.quantiles = quantiles;
    }

    apply_streams(&mut args.streams, matches, config)
}

fn apply_dump(args: &mut DumpArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "dumper")
        && let Some(dumper) = config.dumper.as_deref()
    {
        args.dumper = dumper.parse().map_err(|err| invalid("dumper", err))?;
    }

    apply_streams(&mut args.streams, matches, config)
}

fn apply_streams(args: &mut StreamArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "inputs")
        && let Some(inputs) = config.inputs.as_ref()
    {
        args.inputs = joined_inputs(inputs)?;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = output;
    }

    if !is_cli(matches, "input_format")
        && let Some(format) = config.input_format
    {
        args.input_format = format;
    }

    if !is_cli(matches, "on_source_eof")
        && let Some(policy) = config.on_source_eof
    {
        args.on_source_eof = policy;
    }
    Ok(())
}

fn window_duration(value: &DurationValue) -> Result<Duration, ValidationError> {
    let duration = match value {
        DurationValue::Seconds(secs) => Duration::from_secs(*secs),
        DurationValue::Text(text) => parse_duration_literal(text)?,
    };
    if duration.is_zero() {
        return Err(ValidationError::DurationZero);
    }
    Ok(duration)
}

fn joined_inputs(value: &InputsValue) -> AppResult<String> {
    let joined = match value {
        InputsValue::Joined(text) => text.clone(),
        InputsValue::List(items) => items.join(","),
    };
    if joined.split(',').all(|name| name.trim().is_empty()) {
        return Err(AppError::config(ConfigError::EmptyInputs));
    }
    Ok(joined)
}

fn invalid(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidField { field, source })
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
