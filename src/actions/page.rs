// Page actions.
// Resolves "[server] verb [project] [page]" queries into Redmine URLs.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::alfred::{Feedback, Item};
use crate::error::{Result, WorkflowError};
use crate::redmine::{ClientPool, Project};
use crate::storage::{ProjectCache, ServerConfig, Settings};

use super::pattern::Pattern;

/// Projects requested per API call when filling the cache.
const PROJECTS_PAGE_LIMIT: u32 = 100;

/// Projects listed per query.
const MAX_PROJECT_RESULTS: usize = 10;

/// Characters of a project description shown as subtitle.
const SUBTITLE_LENGTH: usize = 50;

const SERVER_ICON: &str = "assets/icons/redmine.png";

/// Verb selecting which Redmine page to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerb {
    Home,
    Wiki,
    Issues,
    Issue,
}

impl PageVerb {
    /// Verbs in display order.
    pub const ALL: [PageVerb; 4] = [
        PageVerb::Home,
        PageVerb::Wiki,
        PageVerb::Issues,
        PageVerb::Issue,
    ];

    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.keyword() == keyword)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PageVerb::Home => "home",
            PageVerb::Wiki => "wiki",
            PageVerb::Issues => "issues",
            PageVerb::Issue => "issue",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PageVerb::Home => "Project homepage",
            PageVerb::Wiki => "Project wiki page",
            PageVerb::Issues => "Project issues page",
            PageVerb::Issue => "Display issue num",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PageVerb::Home => "assets/icons/home.png",
            PageVerb::Wiki => "assets/icons/wiki.png",
            PageVerb::Issues => "assets/icons/issues.png",
            PageVerb::Issue => "assets/icons/issue.png",
        }
    }

    /// Path appended to a project URL.
    pub fn url_suffix(&self) -> &'static str {
        match self {
            PageVerb::Wiki => "/wiki",
            PageVerb::Issues => "/issues",
            PageVerb::Home | PageVerb::Issue => "",
        }
    }

    /// Whether a selected project leads to a further list (its wiki pages).
    pub fn has_wiki_pages(&self) -> bool {
        matches!(self, PageVerb::Wiki)
    }
}

/// Server selected for the current query.
struct Target<'a> {
    id: &'a str,
    server: &'a ServerConfig,
    /// Autocomplete prefix, `"<id> "` when several servers are configured.
    prefix: String,
}

impl Target<'_> {
    fn base_url(&self) -> &str {
        self.server.url.trim_end_matches('/')
    }
}

/// Handler for the `page` action group.
pub struct PageAction<'a> {
    settings: &'a Settings,
    cache: &'a mut ProjectCache,
    clients: &'a mut ClientPool,
}

impl<'a> PageAction<'a> {
    pub fn new(
        settings: &'a Settings,
        cache: &'a mut ProjectCache,
        clients: &'a mut ClientPool,
    ) -> Self {
        Self {
            settings,
            cache,
            clients,
        }
    }

    pub async fn run(&mut self, query: &str) -> Result<Feedback> {
        let settings = self.settings;
        let args: Vec<&str> = query.trim().split(' ').collect();

        match settings.server_count() {
            0 => Err(WorkflowError::action(
                "No redmine server configuration. Use \"red conf\" key first.",
            )),
            1 => {
                let id = settings
                    .default_server_id()
                    .ok_or_else(|| WorkflowError::Other("default server missing".into()))?;
                let target = self.target(id)?;
                self.prompt_actions(&target, &args).await
            }
            _ => {
                let pattern = args.first().map(|s| s.trim()).unwrap_or_default();
                if settings.contains(pattern) {
                    let target = self.target(pattern)?;
                    self.prompt_actions(&target, &args[1..]).await
                } else {
                    self.prompt_servers(pattern)
                }
            }
        }
    }

    fn target(&self, id: &str) -> Result<Target<'a>> {
        let settings = self.settings;
        let (id, server) = settings
            .server_entry(id)
            .ok_or_else(|| WorkflowError::Other(format!("unknown server {}", id)))?;
        let prefix = if settings.server_count() > 1 {
            format!("{} ", id)
        } else {
            String::new()
        };
        Ok(Target { id, server, prefix })
    }

    /// List configured servers whose identifier matches.
    fn prompt_servers(&self, pattern: &str) -> Result<Feedback> {
        let matcher = Pattern::new(pattern);
        let mut feedback = Feedback::new();

        for (id, server) in self.settings.servers() {
            if matcher.is_match(id) {
                feedback.push(
                    Item::new(&server.name)
                        .icon(SERVER_ICON)
                        .valid(false)
                        .autocomplete(format!("{} ", id)),
                );
            }
        }

        if feedback.is_empty() {
            return Err(WorkflowError::action(
                "No matching redmine configuration found",
            ));
        }
        Ok(feedback)
    }

    /// Dispatch an exact verb, or list the verbs matching the first token.
    async fn prompt_actions(&mut self, target: &Target<'_>, params: &[&str]) -> Result<Feedback> {
        let pattern = params.first().copied().unwrap_or_default();

        if let Some(verb) = PageVerb::parse(pattern) {
            debug!("page action {} on {}", verb.keyword(), target.id);
            return match verb {
                PageVerb::Issue => Ok(issue(target, params)),
                _ => self.project_action(target, verb, params).await,
            };
        }

        let matcher = Pattern::new(pattern);
        let mut feedback = Feedback::new();
        for verb in PageVerb::ALL {
            if matcher.is_match(verb.keyword()) {
                feedback.push(
                    Item::new(verb.title())
                        .icon(verb.icon())
                        .valid(false)
                        .autocomplete(format!("{}{} ", target.prefix, verb.keyword())),
                );
            }
        }

        if feedback.is_empty() {
            return Err(WorkflowError::action("No matching redmine action found"));
        }
        Ok(feedback)
    }

    /// Handle home/wiki/issues: list projects, or a project's wiki pages.
    async fn project_action(
        &mut self,
        target: &Target<'_>,
        verb: PageVerb,
        params: &[&str],
    ) -> Result<Feedback> {
        let project_pattern = params.get(1).copied().unwrap_or_default();

        if verb.has_wiki_pages() && !project_pattern.is_empty() {
            let projects = self.matching_projects(target, project_pattern).await?;
            if projects.iter().any(|p| p.identifier == project_pattern) {
                let wiki_pattern = params.get(2).copied().unwrap_or_default();
                return self
                    .prompt_wiki_pages(target, project_pattern, wiki_pattern)
                    .await;
            }
        }

        self.prompt_projects(target, verb, project_pattern).await
    }

    async fn prompt_projects(
        &mut self,
        target: &Target<'_>,
        verb: PageVerb,
        pattern: &str,
    ) -> Result<Feedback> {
        let projects = self.matching_projects(target, pattern).await?;
        let mut feedback = Feedback::new();

        for project in projects.iter().take(MAX_PROJECT_RESULTS) {
            let subtitle: String = project.description().chars().take(SUBTITLE_LENGTH).collect();
            let item = Item::new(&project.name)
                .uid(&project.identifier)
                .subtitle(subtitle)
                .icon(verb.icon());

            let item = if verb.has_wiki_pages() {
                item.arg("").valid(false).autocomplete(format!(
                    "{}{} {} ",
                    target.prefix,
                    verb.keyword(),
                    project.identifier
                ))
            } else {
                item.arg(format!(
                    "{}/projects/{}{}",
                    target.base_url(),
                    project.identifier,
                    verb.url_suffix()
                ))
                .valid(true)
            };
            feedback.push(item);
        }

        Ok(feedback)
    }

    async fn prompt_wiki_pages(
        &mut self,
        target: &Target<'_>,
        project_id: &str,
        pattern: &str,
    ) -> Result<Feedback> {
        let client = self.clients.for_server(target.id, target.server)?;
        let pages = client.get_wiki_pages(project_id).await?;

        if pages.is_empty() {
            warn!("no wiki pages for project {} on {}", project_id, target.id);
            return Err(WorkflowError::action(format!(
                "No wiki pages for project {}",
                project_id
            )));
        }

        let matcher = Pattern::case_insensitive(pattern);
        let mut feedback = Feedback::new();
        for page in pages.iter().filter(|page| matcher.is_match(&page.title)) {
            let title = match &page.parent {
                Some(parent) => format!("{} \\ {}", parent.title, page.title),
                None => page.title.clone(),
            };
            feedback.push(
                Item::new(title)
                    .arg(format!(
                        "{}/projects/{}/wiki/{}",
                        target.base_url(),
                        project_id,
                        page.title
                    ))
                    .icon(PageVerb::Wiki.icon())
                    .valid(true),
            );
        }

        if feedback.is_empty() {
            return Err(WorkflowError::action("No matching wiki page found"));
        }
        Ok(feedback)
    }

    /// Projects of the target server whose identifier matches `pattern`.
    async fn matching_projects(&mut self, target: &Target<'_>, pattern: &str) -> Result<Vec<Project>> {
        if !self.cache.has_projects(target.id) {
            self.load_projects(target).await?;
        }

        let projects = self.cache.projects(target.id).unwrap_or_default();
        if projects.is_empty() {
            warn!("no project found for redmine server {}", target.id);
            return Err(WorkflowError::action(format!(
                "No project found for redmine server {}",
                target.id
            )));
        }

        let matcher = Pattern::new(pattern);
        let matching: Vec<Project> = projects
            .iter()
            .filter(|project| matcher.is_match(&project.identifier))
            .cloned()
            .collect();

        if matching.is_empty() {
            return Err(WorkflowError::action("No matching project found"));
        }
        Ok(matching)
    }

    /// Fetch every project of a server, newest update first, and cache them.
    async fn load_projects(&mut self, target: &Target<'_>) -> Result<()> {
        let client = self.clients.for_server(target.id, target.server)?;
        let mut projects: IndexMap<String, Project> = IndexMap::new();
        let mut offset: u32 = 0;

        loop {
            let (batch, total_count) = client.get_projects(PROJECTS_PAGE_LIMIT, offset).await?;
            let received = batch.len();
            for project in batch {
                projects.insert(project.identifier.clone(), project);
            }
            // Servers may cap the page size below the requested limit
            offset += received as u32;

            if received == 0 || projects.len() as u64 >= total_count {
                break;
            }
        }

        let mut projects: Vec<Project> = projects.into_values().collect();
        projects.sort_by(|a, b| b.updated_on.cmp(&a.updated_on));
        debug!("loaded {} projects from {}", projects.len(), target.id);

        self.cache.set_projects(target.id, projects);
        if let Err(e) = self.cache.save() {
            warn!("failed to save project cache: {}", e);
        }
        Ok(())
    }
}

/// Item opening an issue by number.
fn issue(target: &Target<'_>, params: &[&str]) -> Feedback {
    let number = params.get(1).copied().unwrap_or_default();
    let verb = PageVerb::Issue;

    let mut feedback = Feedback::new();
    feedback.push(
        Item::new(format!("{} {}", verb.title(), number))
            .arg(format!("{}/issues/{}", target.base_url(), number))
            .icon(verb.icon())
            .valid(true),
    );
    feedback
}
