// Storage module for workflow settings and cached Redmine data.
// Both stores are small JSON documents kept in Alfred's workflow data folders.

pub mod cache;
pub mod json;
pub mod paths;
pub mod settings;

pub use cache::{DEFAULT_TTL, ProjectCache};
pub use settings::{ServerConfig, Settings};
