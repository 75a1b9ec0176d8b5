// Per-server Redmine client pool.
// Creates clients lazily from settings and lets callers inject their own.

use std::collections::HashMap;

use crate::error::Result;
use crate::storage::ServerConfig;

use super::client::RedmineClient;
use super::endpoints::RedmineApi;

/// Redmine clients keyed by server identifier.
#[derive(Default)]
pub struct ClientPool {
    clients: HashMap<String, Box<dyn RedmineApi>>,
}

impl ClientPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client for a server, replacing any existing one.
    pub fn insert(&mut self, server_id: impl Into<String>, client: Box<dyn RedmineApi>) {
        self.clients.insert(server_id.into(), client);
    }

    pub fn remove(&mut self, server_id: &str) -> bool {
        self.clients.remove(server_id).is_some()
    }

    /// Get the client for a server, connecting with `url` and `api_key` on first use.
    pub fn get_or_connect(
        &mut self,
        server_id: &str,
        url: &str,
        api_key: &str,
    ) -> Result<&dyn RedmineApi> {
        if !self.clients.contains_key(server_id) {
            let client = RedmineClient::new(url, api_key)?;
            self.clients.insert(server_id.to_string(), Box::new(client));
        }
        Ok(self.clients[server_id].as_ref())
    }

    /// Get the client for a configured server.
    pub fn for_server(&mut self, server_id: &str, config: &ServerConfig) -> Result<&dyn RedmineApi> {
        self.get_or_connect(server_id, &config.url, &config.api_key)
    }
}
