use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use plugin_installer::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command_name = match &args.command {
        cli::Command::Provision(_) => "provision",
        cli::Command::Install(_) => "install",
        cli::Command::Check(_) => "check",
        cli::Command::Completions(opts) => {
            commands::completions::run(opts.shell);
            return Ok(());
        }
        cli::Command::Version => {
            commands::version::run();
            return Ok(());
        }
    };

    logging::init_subscriber(args.verbose, command_name);
    let log = Arc::new(logging::Logger::new(command_name));

    match &args.command {
        cli::Command::Provision(opts) => commands::provision::run(&args.global, opts, &log),
        cli::Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        cli::Command::Check(opts) => commands::check::run(&args.global, opts, &log),
        cli::Command::Completions(_) | cli::Command::Version => Ok(()),
    }
}
