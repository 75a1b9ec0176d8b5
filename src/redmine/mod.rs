// Redmine API module.
// Provides client, pool, and types for interacting with the Redmine REST API.

pub mod client;
pub mod endpoints;
#[cfg(test)]
pub mod fake;
pub mod pool;
pub mod types;

pub use endpoints::RedmineApi;
pub use pool::ClientPool;
pub use types::*;
