// Command-line interface and tracing setup.
// Alfred calls `run` from script filters and `save` from run-script actions.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};

use crate::actions::ActionGroup;
use crate::config::WorkflowConfig;

/// Redmine workflow for Alfred.
#[derive(Debug, Parser)]
#[command(
    name = "redmine-workflow",
    version,
    about = "Browse Redmine projects, wiki pages, and issues from Alfred.",
    long_about = None,
)]
pub struct Cli {
    /// Folder for persistent data (settings).
    #[arg(long, env = "alfred_workflow_data", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Folder for cached Redmine data.
    #[arg(long, env = "alfred_workflow_cache", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Seconds before cached projects are fetched again.
    #[arg(long, env = "REDMINE_WORKFLOW_CACHE_TTL", default_value_t = 86_400, global = true)]
    pub cache_ttl: u64,

    /// Log debug messages.
    #[arg(
        long,
        env = "alfred_debug",
        global = true,
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new(),
    )]
    pub debug: bool,

    /// Log file (defaults to rw-debug.log in the temp dir).
    #[arg(long, env = "REDMINE_WORKFLOW_LOG", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print Alfred script filter JSON for a query.
    Run {
        #[arg(value_enum)]
        group: ActionGroup,

        /// Raw Alfred query.
        #[arg(default_value = "", allow_hyphen_values = true)]
        query: String,
    },

    /// Apply the argument of an actioned item and print a notification.
    Save {
        #[arg(value_enum)]
        group: ActionGroup,

        /// Item argument, e.g. "add <id> <url> <api-key> <name>".
        #[arg(default_value = "", allow_hyphen_values = true)]
        query: String,
    },
}

/// Send logs to the workflow log file; stdout is reserved for Alfred.
pub fn init_tracing(config: &WorkflowConfig) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if config.debug {
        "redmine_workflow=debug"
    } else {
        "redmine_workflow=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        Ok(file) => {
            fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Err(_) => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
