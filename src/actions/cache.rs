// Cache actions.
// Lets the user drop cached project lists so they are fetched again.

use crate::alfred::{Feedback, Item};
use crate::error::Result;
use crate::storage::ProjectCache;

const CLEAR_CACHE: &str = "clear-cache";

/// Handler for the `cache` action group.
pub struct CacheAction<'a> {
    cache: &'a mut ProjectCache,
}

impl<'a> CacheAction<'a> {
    pub fn new(cache: &'a mut ProjectCache) -> Self {
        Self { cache }
    }

    /// The only offered action is clearing the cache, whatever the query.
    pub fn run(&self) -> Feedback {
        let mut feedback = Feedback::new();
        feedback.push(
            Item::new("Clear workflow cache data")
                .uid(CLEAR_CACHE)
                .arg(CLEAR_CACHE)
                .icon("assets/icons/clear-cache.png")
                .valid(true),
        );
        feedback
    }

    pub fn save(&mut self, query: &str) -> Result<Option<String>> {
        if query.trim().split(' ').next() != Some(CLEAR_CACHE) {
            return Ok(None);
        }

        self.cache.clear();
        self.cache.save()?;
        Ok(Some("Cache cleared".to_string()))
    }
}
