// Application entry points.
// Opens the stores described by the config and runs one CLI command.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::actions::{ActionGroup, Workflow, failure_feedback};
use crate::cli::Command;
use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::redmine::ClientPool;
use crate::storage::{ProjectCache, Settings};

/// Load settings and the project cache, creating their folders when missing.
pub fn open_workflow(config: &WorkflowConfig) -> Result<Workflow> {
    fs::create_dir_all(&config.data_dir)?;
    fs::create_dir_all(&config.cache_dir)?;

    let mut settings = Settings::new(config.settings_path());
    settings.load()?;

    let mut cache = ProjectCache::new(config.cache_path(), config.cache_ttl);
    cache.load()?;

    let workflow =
        Workflow::new(settings, cache, ClientPool::new()).with_log_file(&config.log_file);
    debug!(
        "loaded {} server(s), cached projects: {}",
        workflow.settings().server_count(),
        !workflow.cache().is_empty()
    );
    Ok(workflow)
}

/// Open the stores and run one command. Returns what should be printed on stdout.
///
/// `run` always yields script filter JSON, even when the stores cannot be opened.
pub async fn run(config: &WorkflowConfig, command: Command) -> Result<Option<String>> {
    match open_workflow(config) {
        Ok(mut workflow) => execute(&mut workflow, command).await,
        Err(e) => match command {
            Command::Run { group, .. } => failure_json(group, e, Some(&config.log_file)).map(Some),
            Command::Save { .. } => Err(e),
        },
    }
}

/// Script filter JSON holding a single failure item.
pub fn failure_json(group: ActionGroup, err: WorkflowError, log_file: Option<&Path>) -> Result<String> {
    failure_feedback(group, err, log_file).to_json()
}

/// Run a command and return what should be printed on stdout.
pub async fn execute(workflow: &mut Workflow, command: Command) -> Result<Option<String>> {
    match command {
        Command::Run { group, query } => {
            let feedback = workflow.run(group, &query).await;
            feedback.to_json().map(Some)
        }
        Command::Save { group, query } => match workflow.save(group, &query) {
            // Shown as the Alfred notification text
            Err(e) if e.is_action() => Ok(Some(e.to_string())),
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> WorkflowConfig {
        WorkflowConfig {
            data_dir: dir.path().join("data"),
            cache_dir: dir.path().join("cache"),
            cache_ttl: crate::storage::DEFAULT_TTL,
            debug: false,
            log_file: dir.path().join("debug.log"),
        }
    }

    #[tokio::test]
    async fn test_save_then_run_across_invocations() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let mut workflow = open_workflow(&config).unwrap();
        assert!(config.data_dir.is_dir());
        let output = execute(
            &mut workflow,
            Command::Save {
                group: ActionGroup::Config,
                query: "add test1 https://test1.example.com key Test One".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(output.as_deref(), Some("Configuration added"));

        let mut workflow = open_workflow(&config).unwrap();
        let output = execute(
            &mut workflow,
            Command::Run {
                group: ActionGroup::Page,
                query: "issue 42".into(),
            },
        )
        .await
        .unwrap()
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            json["items"][0]["arg"],
            "https://test1.example.com/issues/42"
        );
    }

    #[tokio::test]
    async fn test_save_action_error_is_printed() {
        let dir = TempDir::new().unwrap();
        let mut workflow = open_workflow(&config(&dir)).unwrap();

        let output = execute(
            &mut workflow,
            Command::Save {
                group: ActionGroup::Config,
                query: "add test1".into(),
            },
        )
        .await
        .unwrap();
        assert!(output.unwrap().starts_with("Provide params"));
    }

    #[tokio::test]
    async fn test_unreadable_settings_still_print_feedback() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::create_dir_all(config.settings_path()).unwrap();

        let output = run(
            &config,
            Command::Run {
                group: ActionGroup::Page,
                query: "home".into(),
            },
        )
        .await
        .unwrap()
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        let items = json["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "An error occurred");
        assert_eq!(items[0]["icon"]["path"], "assets/icons/warning.png");
        assert_eq!(items[0]["arg"], config.log_file.to_str().unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_settings_fail_save() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::create_dir_all(config.settings_path()).unwrap();

        let result = run(
            &config,
            Command::Save {
                group: ActionGroup::Cache,
                query: "clear-cache".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(WorkflowError::Io(_))));
    }
}
