// Project cache with a time-to-live.
// Stores each server's project list; the whole file goes stale after the TTL.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tracing::debug;

use crate::error::Result;
use crate::redmine::Project;

use super::json::{JsonStore, modified_at};

/// Default TTL for cached project lists: one day.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache document: server id -> projects, newest update first.
#[derive(Debug, Clone)]
pub struct ProjectCache {
    store: JsonStore<Vec<Project>>,
    ttl: Duration,
}

impl ProjectCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            store: JsonStore::new(path),
            ttl,
        }
    }

    /// Load the cache file unless it was last written more than `ttl` ago.
    pub fn load(&mut self) -> Result<()> {
        if self.is_fresh() {
            self.store.load()
        } else {
            debug!("project cache {} is stale", self.store.path().display());
            self.store.clear();
            Ok(())
        }
    }

    /// Whether the cache file exists and is younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        let Ok(modified) = modified_at(self.store.path()) else {
            return false;
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age <= self.ttl,
            // Modified in the future (clock skew): treat as fresh.
            Err(_) => true,
        }
    }

    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    pub fn has_projects(&self, server_id: &str) -> bool {
        self.store.contains(server_id)
    }

    pub fn projects(&self, server_id: &str) -> Option<&[Project]> {
        self.store.get(server_id).map(Vec::as_slice)
    }

    pub fn set_projects(&mut self, server_id: impl Into<String>, projects: Vec<Project>) {
        self.store.insert(server_id, projects);
    }

    /// Drop one server's projects. Returns whether anything was cached.
    pub fn forget(&mut self, server_id: &str) -> bool {
        self.store.remove(server_id).is_some()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
