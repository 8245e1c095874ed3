//! `tracker`: command-line front end for the learning-progress tracker.

use std::process::ExitCode;

use clap::Parser;
use services::TrackerServices;
use tracing::debug;

mod commands;
mod config;
mod timer;

use crate::commands::Command;
use crate::config::{Config, GlobalArgs, init_tracing};

#[derive(Debug, Parser)]
#[command(name = "tracker")]
#[command(version)]
#[command(about = "Track study sessions against a 48-week learning program", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_args(&cli.global)?;
    debug!(
        data_dir = %config.data_dir.display(),
        start_date = %config.plan.start_date(),
        "configuration resolved"
    );

    let services = TrackerServices::json_dir(&config.data_dir, config.clock, config.plan)?;
    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, &services, &mut stdout).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
