// In-memory Redmine server for action tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Result, WorkflowError};

use super::endpoints::RedmineApi;
use super::types::{Project, User, WikiPage, WikiPageRef};

/// Fake `RedmineApi` serving canned projects, wiki pages, and a user.
#[derive(Default)]
pub struct FakeRedmine {
    projects: Vec<Project>,
    page_size: Option<usize>,
    pages: Option<Vec<Vec<Project>>>,
    total_count: Option<u64>,
    wiki: HashMap<String, Vec<WikiPage>>,
    user: Option<User>,
    failing: bool,
    project_calls: Arc<AtomicUsize>,
}

impl FakeRedmine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    /// Serve at most `size` projects per call regardless of the requested limit.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Add wiki pages as `(title, parent title)` pairs.
    /// Serve these pages in call order, then empty pages, ignoring limit and offset.
    pub fn with_pages(mut self, pages: Vec<Vec<Project>>) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Report `total` as the server-side project count.
    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }

    pub fn with_wiki(mut self, project: &str, pages: &[(&str, Option<&str>)]) -> Self {
        let pages = pages
            .iter()
            .map(|(title, parent)| WikiPage {
                title: title.to_string(),
                parent: parent.map(|p| WikiPageRef {
                    title: p.to_string(),
                }),
                version: Some(1),
                created_on: None,
                updated_on: None,
            })
            .collect();
        self.wiki.insert(project.to_string(), pages);
        self
    }

    pub fn with_user(mut self, login: &str) -> Self {
        self.user = Some(User {
            id: 1,
            login: login.to_string(),
            firstname: String::new(),
            lastname: String::new(),
            mail: None,
        });
        self
    }

    /// Reject every project and wiki request as unauthorized.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Counter of `get_projects` calls, shared with the boxed client.
    pub fn project_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.project_calls)
    }
}

#[async_trait]
impl RedmineApi for FakeRedmine {
    async fn get_current_user(&self) -> Result<User> {
        self.user.clone().ok_or(WorkflowError::Unauthorized)
    }

    async fn get_projects(&self, limit: u32, offset: u32) -> Result<(Vec<Project>, u64)> {
        let call = self.project_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(WorkflowError::Unauthorized);
        }
        if let Some(pages) = &self.pages {
            let page = pages.get(call).cloned().unwrap_or_default();
            let total = self.total_count.unwrap_or(page.len() as u64);
            return Ok((page, total));
        }
        let size = self.page_size.unwrap_or(limit as usize).min(limit as usize);
        let page = self
            .projects
            .iter()
            .skip(offset as usize)
            .take(size)
            .cloned()
            .collect();
        let total = self.total_count.unwrap_or(self.projects.len() as u64);
        Ok((page, total))
    }

    async fn get_wiki_pages(&self, project: &str) -> Result<Vec<WikiPage>> {
        if self.failing {
            return Err(WorkflowError::Unauthorized);
        }
        Ok(self.wiki.get(project).cloned().unwrap_or_default())
    }
}
