//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::platform::Os;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "plugin-installer",
    about = "Stage audio plug-ins and deploy them to the system plug-in folders",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Flags accepted by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Target platform (defaults to the host)
    #[arg(long, global = true, value_enum)]
    pub platform: Option<Os>,

    /// Settings file (defaults to $PLUGIN_INSTALLER_CONFIG or
    /// $XDG_CONFIG_HOME/plugin-installer/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the staging folder layout under BASE
    Provision(ProvisionOpts),
    /// Copy staged plug-ins to their destinations and run installers
    Install(InstallOpts),
    /// Inspect a staging root without changing anything
    Check(CheckOpts),
    /// Print shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for the `provision` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ProvisionOpts {
    /// Existing directory to create the staging root in
    pub base: PathBuf,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Staging root created by `provision`
    pub staging_root: PathBuf,

    /// Stop running installers after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Also write the report as JSON to FILE
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Options for the `check` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CheckOpts {
    /// Staging root to inspect
    pub staging_root: PathBuf,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
