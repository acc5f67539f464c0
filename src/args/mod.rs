//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Command, DumpArgs, ReportArgs, StreamArgs};
pub(crate) use parsers::{parse_duration_literal, parse_inputs};
