// Alfred workflow for Redmine.
// Prints script filter results or applies settings changes for one query.

mod actions;
mod alfred;
mod app;
mod cli;
mod config;
mod error;
mod redmine;
mod storage;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use cli::{Cli, Command};
use config::WorkflowConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match WorkflowConfig::from_cli(&cli) {
        Ok(config) => {
            cli::init_tracing(&config);
            app::run(&config, cli.command).await
        }
        Err(e) => match cli.command {
            // Script filters must always get a result list
            Command::Run { group, .. } => app::failure_json(group, e, None).map(Some),
            Command::Save { .. } => Err(e),
        },
    };

    match result {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
