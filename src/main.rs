use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use log::info;
use std::process::ExitCode;

use sales_report::cli::commands::process_command;
use sales_report::cli::{Cli, Commands};
use sales_report::config::Config;
use sales_report::ui;

const LOG_FILE: &str = "sales-report.log";

fn main() -> Result<ExitCode> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE)
        .with_context(|| format!("Failed to open log file {}", LOG_FILE))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    info!("Starting sales-report");

    match cli.command {
        Some(Commands::Process(args)) => process_command(args, &config),
        None => {
            if !std::io::stdout().is_terminal() {
                anyhow::bail!(
                    "The interactive window needs a terminal; use `sales-report process <FILE>` instead"
                );
            }
            ui::run(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
