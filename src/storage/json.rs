// JSON document store.
// Keeps an ordered key/value document in memory and persists it to a single file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::Result;

/// Ordered JSON object backed by a file.
#[derive(Debug, Clone)]
pub struct JsonStore<V> {
    path: PathBuf,
    data: IndexMap<String, V>,
}

impl<V> JsonStore<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Create an empty store bound to `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: IndexMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace in-memory data with the file contents.
    ///
    /// A missing or empty file yields an empty document. A file that does not
    /// hold a JSON object is ignored with a warning.
    pub fn load(&mut self) -> Result<()> {
        self.data.clear();

        let Some(contents) = read_text(&self.path)? else {
            return Ok(());
        };
        if contents.trim().is_empty() {
            return Ok(());
        }

        match serde_json::from_str::<IndexMap<String, V>>(&contents) {
            Ok(data) => self.data = data,
            Err(e) => warn!("ignoring unreadable {}: {}", self.path.display(), e),
        }
        Ok(())
    }

    /// Persist the document. An empty document is written as an empty file.
    pub fn save(&self) -> Result<()> {
        let contents = if self.data.is_empty() {
            String::new()
        } else {
            serde_json::to_string_pretty(&self.data)?
        };
        write_text(&self.path, &contents)
    }

    pub fn data(&self) -> &IndexMap<String, V> {
        &self.data
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.data.get(key)
    }

    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.data
            .get_key_value(key)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Insert or replace a value. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.data.insert(key.into(), value);
    }

    /// Remove a key while keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.data.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Write text to a file atomically via a temp file.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read a whole file, `None` when it does not exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    Ok(Some(contents))
}

/// Get the modification time of a file.
pub fn modified_at(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
