#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::unnecessary_wraps)]

mod commands;
mod logging;
mod runner;

use clap::Parser;
use miette::Result;
use multireg_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "multireg")]
#[command(
    author,
    version,
    about = "Install package groups from several npm registries in one project",
    long_about = None
)]
struct Cli {
    /// Increase logging verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json: bool,

    /// Override the project directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install every package group from its registry, then the remaining dependencies
    #[command(visible_alias = "i")]
    Install {
        /// Print the commands that would run without running them
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Commands::Install { dry_run } => commands::install::run(&config.with_dry_run(dry_run)),
    }
}
