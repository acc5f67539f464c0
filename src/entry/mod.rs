mod plan;

use clap::{CommandFactory, FromArgMatches};

use crate::args::Cli;
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

/// Parses the command line, merges the config file, and runs the selected
/// command to completion on a single-threaded runtime.
///
/// # Errors
///
/// Returns the first configuration, I/O, decode or write error.
pub fn run() -> AppResult<()> {
    let matches = Cli::command().get_matches();
    let mut cli = Cli::from_arg_matches(&matches)?;

    if let Some(config) = crate::config::load_config(cli.config.as_deref())? {
        crate::config::apply_config(&mut cli, &matches, &config)?;
    }

    crate::system::logger::init_logging(cli.verbose, cli.no_color);

    let plan = build_plan(cli)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute_plan(plan))
}
