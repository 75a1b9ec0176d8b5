// Alfred output module.
// Collects result items and serializes them as script filter JSON.

pub mod item;

use serde::Serialize;

pub use item::Item;

use crate::error::Result;

/// Ordered list of items returned to Alfred.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feedback {
    items: Vec<Item>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    #[allow(dead_code)]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize as `{"items": [...]}`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
