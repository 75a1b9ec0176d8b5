// Redmine API endpoint functions.
// Provides the typed calls the workflow needs behind the `RedmineApi` trait.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, WorkflowError};

use super::client::RedmineClient;
use super::types::{Project, User, WikiPage};

/// Response wrapper for the current user.
#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

/// Response wrapper for the projects list.
#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    projects: Vec<Project>,
    total_count: u64,
}

/// Response wrapper for a wiki index.
#[derive(Debug, Deserialize)]
struct WikiPagesResponse {
    #[serde(default)]
    wiki_pages: Vec<WikiPage>,
}

/// Read-only Redmine operations used by the workflow actions.
#[async_trait]
pub trait RedmineApi: Send + Sync {
    /// Get the user owning the api-key.
    async fn get_current_user(&self) -> Result<User>;

    /// Get one page of projects and the server-side total.
    async fn get_projects(&self, limit: u32, offset: u32) -> Result<(Vec<Project>, u64)>;

    /// Get a project's wiki index. Empty when the project has no wiki.
    async fn get_wiki_pages(&self, project: &str) -> Result<Vec<WikiPage>>;
}

#[async_trait]
impl RedmineApi for RedmineClient {
    async fn get_current_user(&self) -> Result<User> {
        let response = self.get("/users/current.json").await?;
        let wrapper: UserResponse = response.json().await?;
        Ok(wrapper.user)
    }

    async fn get_projects(&self, limit: u32, offset: u32) -> Result<(Vec<Project>, u64)> {
        let params = [("limit", limit.to_string()), ("offset", offset.to_string())];
        let response = self.get_with_params("/projects.json", &params).await?;
        let wrapper: ProjectsResponse = response.json().await?;
        Ok((wrapper.projects, wrapper.total_count))
    }

    async fn get_wiki_pages(&self, project: &str) -> Result<Vec<WikiPage>> {
        match self
            .get(&format!("/projects/{}/wiki/index.json", project))
            .await
        {
            Ok(response) => {
                let wrapper: WikiPagesResponse = response.json().await?;
                Ok(wrapper.wiki_pages)
            }
            // Wiki module disabled for this project
            Err(WorkflowError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
