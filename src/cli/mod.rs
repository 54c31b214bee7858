//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
mod report;
mod run;

pub use args::{Arguments, Command, CommonArgs, ExtractCommand};
pub use exit_status::ExitStatus;
pub use report::ExtractSummary;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();
    logging::init(verbose);

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args, verbose)
}
