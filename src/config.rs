// Workflow configuration.
// Resolves data, cache, and log locations from flags, Alfred env vars, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{Result, WorkflowError};
use crate::storage::paths;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Folder holding `settings.json`.
    pub data_dir: PathBuf,
    /// Folder holding `cache-projects.json`.
    pub cache_dir: PathBuf,
    /// Age after which cached projects are fetched again.
    pub cache_ttl: Duration,
    pub debug: bool,
    pub log_file: PathBuf,
}

impl WorkflowConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => paths::default_data_dir().ok_or_else(no_home)?,
        };
        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => paths::default_cache_dir().ok_or_else(no_home)?,
        };

        Ok(Self {
            data_dir,
            cache_dir,
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            debug: cli.debug,
            log_file: cli
                .log_file
                .clone()
                .unwrap_or_else(paths::default_log_file),
        })
    }

    pub fn settings_path(&self) -> PathBuf {
        paths::settings_path(&self.data_dir)
    }

    pub fn cache_path(&self) -> PathBuf {
        paths::cache_path(&self.cache_dir)
    }
}

fn no_home() -> WorkflowError {
    WorkflowError::Other("cannot determine home directory, pass --data-dir and --cache-dir".into())
}
