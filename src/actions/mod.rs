// Workflow actions.
// Dispatches a query to its action group and turns failures into result items.

pub mod cache;
pub mod config;
pub mod page;
pub mod pattern;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::alfred::{Feedback, Item};
use crate::error::{Result, WorkflowError};
use crate::redmine::ClientPool;
use crate::storage::{ProjectCache, Settings};

pub use cache::CacheAction;
pub use config::ConfigAction;
pub use page::PageAction;

const WARNING_ICON: &str = "assets/icons/warning.png";

/// Group of actions bound to one Alfred keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionGroup {
    /// Browse servers, projects, wiki pages, and issues.
    Page,
    /// Add or remove server configurations.
    Config,
    /// Manage cached Redmine data.
    Cache,
}

impl fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionGroup::Page => "page",
            ActionGroup::Config => "config",
            ActionGroup::Cache => "cache",
        };
        f.write_str(name)
    }
}

/// Workflow state shared by every action group.
pub struct Workflow {
    settings: Settings,
    cache: ProjectCache,
    clients: ClientPool,
    log_file: Option<PathBuf>,
}

impl Workflow {
    /// Build a workflow from already loaded stores.
    pub fn new(settings: Settings, cache: ProjectCache, clients: ClientPool) -> Self {
        Self {
            settings,
            cache,
            clients,
            log_file: None,
        }
    }

    /// Debug log offered by the generic failure item.
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &ProjectCache {
        &self.cache
    }

    /// Build the result list for a query. Errors become result items.
    pub async fn run(&mut self, group: ActionGroup, query: &str) -> Feedback {
        debug!("run {} {:?}", group, query);

        let result = match group {
            ActionGroup::Page => {
                PageAction::new(&self.settings, &mut self.cache, &mut self.clients)
                    .run(query)
                    .await
            }
            ActionGroup::Config => {
                ConfigAction::new(&mut self.settings, &mut self.cache, &mut self.clients)
                    .run(query)
                    .await
            }
            ActionGroup::Cache => Ok(CacheAction::new(&mut self.cache).run()),
        };

        match result {
            Ok(feedback) => {
                debug!("{} item(s) for {}", feedback.len(), group);
                feedback
            }
            Err(e) => failure_feedback(group, e, self.log_file.as_deref()),
        }
    }

    /// Apply the argument of an actioned item. Returns the notification text.
    pub fn save(&mut self, group: ActionGroup, query: &str) -> Result<Option<String>> {
        debug!("save {} {:?}", group, query);

        match group {
            ActionGroup::Page => Ok(None),
            ActionGroup::Config => {
                ConfigAction::new(&mut self.settings, &mut self.cache, &mut self.clients)
                    .save(query)
            }
            ActionGroup::Cache => CacheAction::new(&mut self.cache).save(query),
        }
    }
}

/// Render a failure as a single warning item.
///
/// Action errors only show their message. Other errors are logged and, when a
/// log file is known, actioning the item opens it so the failure can be reported.
pub fn failure_feedback(
    group: ActionGroup,
    err: WorkflowError,
    log_file: Option<&Path>,
) -> Feedback {
    let item = match err {
        WorkflowError::Action(message) => {
            debug!("{}: {}", group, message);
            Item::new(message).valid(false)
        }
        err => {
            error!("{}: {}", group, err);
            let item = Item::new("An error occurred");
            match log_file {
                Some(path) => item
                    .subtitle(format!("{}. Please submit an issue with {}", err, path.display()))
                    .arg(path.display().to_string())
                    .valid(true),
                None => item.subtitle(err.to_string()).valid(false),
            }
        }
    };

    let mut feedback = Feedback::new();
    feedback.push(item.icon(WARNING_ICON));
    feedback
}
