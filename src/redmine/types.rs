// Redmine API response types.
// Defines structs for deserializing Redmine REST API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to another record by id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdName {
    pub id: u64,
    pub name: String,
}

/// Redmine project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default)]
    pub parent: Option<IdName>,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: DateTime<Utc>,
}

impl Project {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Title-only reference to a parent wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPageRef {
    pub title: String,
}

/// Entry of a project's wiki index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiPage {
    pub title: String,
    #[serde(default)]
    pub parent: Option<WikiPageRef>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_on: Option<DateTime<Utc>>,
}

/// Redmine user, as returned for the api-key owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub mail: Option<String>,
}
