// Redmine server settings.
// Maps server identifiers to their URL, api-key, and display name.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};

use super::json::JsonStore;

/// Connection details for one Redmine server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub url: String,
    #[serde(rename = "api-key")]
    pub api_key: String,
}

/// Settings document: server id -> server config.
#[derive(Debug, Clone)]
pub struct Settings {
    store: JsonStore<ServerConfig>,
}

impl Settings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        self.store.load()
    }

    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    pub fn server_count(&self) -> usize {
        self.store.len()
    }

    /// The only configured server, when there is exactly one.
    pub fn default_server_id(&self) -> Option<&str> {
        if self.store.len() == 1 {
            self.store.data().keys().next().map(String::as_str)
        } else {
            None
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.contains(id)
    }

    pub fn server(&self, id: &str) -> Option<&ServerConfig> {
        self.store.get(id)
    }

    /// Stored identifier and config for `id`.
    pub fn server_entry(&self, id: &str) -> Option<(&str, &ServerConfig)> {
        self.store.get_key_value(id)
    }

    /// Configured servers in insertion order.
    pub fn servers(&self) -> impl Iterator<Item = (&str, &ServerConfig)> {
        self.store
            .data()
            .iter()
            .map(|(id, config)| (id.as_str(), config))
    }

    /// Add or replace a server from `id url api-key name...` tokens and save.
    pub fn add_server(&mut self, params: &[&str]) -> Result<()> {
        let [id, url, api_key, name @ ..] = params else {
            return Err(WorkflowError::action(
                "Provide params: <identifier> <url> <api-key> <name>",
            ));
        };

        self.store.insert(
            *id,
            ServerConfig {
                name: name.join(" "),
                url: (*url).to_string(),
                api_key: (*api_key).to_string(),
            },
        );
        self.save()
    }

    /// Remove a server and save. Returns whether it was configured.
    pub fn remove_server(&mut self, id: &str) -> Result<bool> {
        let existed = self.store.remove(id).is_some();
        self.save()?;
        Ok(existed)
    }
}
