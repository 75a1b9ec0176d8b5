// Config actions.
// Adds and removes Redmine server configurations from Alfred.

use tracing::{debug, warn};
use url::Url;

use crate::alfred::{Feedback, Item};
use crate::error::Result;
use crate::redmine::ClientPool;
use crate::storage::{ProjectCache, Settings};

use super::pattern::Pattern;

const ADD_USAGE: &str = "Provide params: <identifier> <url> <api-key> <name>";
const CONNECTION_FAILED: &str =
    "Impossible to connect to the Redmine server with the URL and api-key provided";

/// Settings operation offered by the `config` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigVerb {
    Add,
    Remove,
}

impl ConfigVerb {
    pub const ALL: [ConfigVerb; 2] = [ConfigVerb::Add, ConfigVerb::Remove];

    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.keyword() == keyword)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ConfigVerb::Add => "add",
            ConfigVerb::Remove => "remove",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfigVerb::Add => "Add new Redmine server config",
            ConfigVerb::Remove => "Remove existing Redmine server config",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ConfigVerb::Add => "assets/icons/add.png",
            ConfigVerb::Remove => "assets/icons/remove.png",
        }
    }
}

/// Handler for the `config` action group.
pub struct ConfigAction<'a> {
    settings: &'a mut Settings,
    cache: &'a mut ProjectCache,
    clients: &'a mut ClientPool,
}

impl<'a> ConfigAction<'a> {
    pub fn new(
        settings: &'a mut Settings,
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
        let args: Vec<&str> = query.trim().split(' ').collect();
        let pattern = args.first().copied().unwrap_or_default();

        match ConfigVerb::parse(pattern) {
            Some(ConfigVerb::Add) => Ok(self.prompt_add(&args[1..]).await),
            Some(ConfigVerb::Remove) => Ok(self.prompt_remove(&args[1..])),
            None => {
                let matcher = Pattern::new(pattern);
                let mut feedback = Feedback::new();
                for verb in ConfigVerb::ALL {
                    if matcher.is_match(verb.keyword()) {
                        feedback.push(
                            Item::new(verb.keyword())
                                .uid(verb.keyword())
                                .arg("")
                                .subtitle(verb.description())
                                .icon(verb.icon())
                                .valid(false)
                                .autocomplete(format!("{} ", verb.keyword())),
                        );
                    }
                }
                Ok(feedback)
            }
        }
    }

    /// Item confirming a complete `add` query, or prompting for what is missing.
    async fn prompt_add(&mut self, params: &[&str]) -> Feedback {
        let verb = ConfigVerb::Add;
        let problem = self.check_add_params(params).await;
        let mut feedback = Feedback::new();

        let item = match problem {
            None if params.len() >= 4 => Item::new(verb.description())
                .arg(format!("add {}", params.join(" ")))
                .valid(true),
            problem => {
                let typed = if params.is_empty() {
                    String::new()
                } else {
                    format!("{} ", params.join(" "))
                };
                Item::new(verb.description())
                    .arg("")
                    .subtitle(problem.unwrap_or_else(|| ADD_USAGE.to_string()))
                    .valid(false)
                    .autocomplete(format!("add {}", typed))
            }
        };

        feedback.push(item.icon(verb.icon()));
        feedback
    }

    /// First problem with the `add` params typed so far, if any.
    async fn check_add_params(&mut self, params: &[&str]) -> Option<String> {
        if let Some(id) = params.first() {
            if self.settings.contains(id) {
                return Some(format!("Identifier {} already exists", id));
            }
        }

        if let Some(url) = params.get(1) {
            if !is_valid_url(url) {
                return Some(format!("Redmine URL {} not valid", url));
            }
        }

        if params.len() >= 4 {
            let (id, url, api_key) = (params[0], params[1], params[2]);
            let connected = match self.clients.get_or_connect(id, url, api_key) {
                Ok(client) => client
                    .get_current_user()
                    .await
                    .map(|user| debug!("connected to {} as {}", url, user.login)),
                Err(e) => Err(e),
            };
            if let Err(e) = connected {
                debug!("connection check for {} failed: {}", url, e);
                return Some(CONNECTION_FAILED.to_string());
            }
        }

        None
    }

    /// Items removing the named server, or every server matching the token.
    fn prompt_remove(&self, params: &[&str]) -> Feedback {
        let pattern = params.first().copied().unwrap_or_default();
        let verb = ConfigVerb::Remove;
        let mut feedback = Feedback::new();

        let remove_item = |id: &str, name: &str| {
            Item::new(id)
                .arg(format!("remove {}", id))
                .subtitle(format!("Remove {} configuration", name))
                .icon(verb.icon())
                .valid(true)
        };

        if let Some(server) = self.settings.server(pattern) {
            feedback.push(remove_item(pattern, &server.name));
            return feedback;
        }

        let matcher = Pattern::new(pattern);
        for (id, server) in self.settings.servers() {
            if matcher.is_match(id) {
                feedback.push(remove_item(id, &server.name));
            }
        }
        feedback
    }

    /// Apply an `add ...` or `remove <id>` argument produced by `run`.
    pub fn save(&mut self, query: &str) -> Result<Option<String>> {
        let params: Vec<&str> = query.trim().split(' ').collect();

        match params.first().copied().and_then(ConfigVerb::parse) {
            Some(ConfigVerb::Add) => {
                self.settings.add_server(&params[1..])?;
                Ok(Some("Configuration added".to_string()))
            }
            Some(ConfigVerb::Remove) => {
                let Some(id) = params.get(1).copied().filter(|id| !id.is_empty()) else {
                    return Ok(None);
                };
                self.settings.remove_server(id)?;
                self.clients.remove(id);
                if self.cache.forget(id) {
                    if let Err(e) = self.cache.save() {
                        warn!("failed to save project cache: {}", e);
                    }
                }
                Ok(Some("Configuration removed".to_string()))
            }
            None => Ok(None),
        }
    }
}

/// Absolute http(s) URL with a host.
fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redmine::fake::FakeRedmine;
    use crate::redmine::types::tests::project;
    use crate::storage::DEFAULT_TTL;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        settings: Settings,
        cache: ProjectCache,
        clients: ClientPool,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let mut settings = Settings::new(dir.path().join("settings.json"));
            settings
                .add_server(&["test1", "https://test1.example.com", "key", "Test", "One"])
                .unwrap();
            let cache = ProjectCache::new(dir.path().join("cache-projects.json"), DEFAULT_TTL);
            Self {
                dir,
                settings,
                cache,
                clients: ClientPool::new(),
            }
        }

        fn action(&mut self) -> ConfigAction<'_> {
            ConfigAction::new(&mut self.settings, &mut self.cache, &mut self.clients)
        }
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://redmine.example.com"));
        assert!(is_valid_url("http://localhost:3000/redmine"));
        assert!(!is_valid_url("redmine.example.com"));
        assert!(!is_valid_url("ftp://redmine.example.com"));
        assert!(!is_valid_url("http//broken"));
    }

    #[tokio::test]
    async fn test_lists_actions() {
        let mut fixture = Fixture::new();

        let feedback = fixture.action().run("").await.unwrap();
        assert_eq!(feedback.len(), 2);
        let add = &feedback.items()[0];
        assert_eq!(add.title, "add");
        assert_eq!(add.subtitle.as_deref(), Some("Add new Redmine server config"));
        assert_eq!(add.autocomplete.as_deref(), Some("add "));

        let feedback = fixture.action().run("rem").await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback.items()[0].title, "remove");

        let feedback = fixture.action().run("zzz").await.unwrap();
        assert!(feedback.is_empty());
    }

    #[tokio::test]
    async fn test_add_prompts_for_params() {
        let mut fixture = Fixture::new();

        let feedback = fixture.action().run("add").await.unwrap();
        let item = &feedback.items()[0];
        assert_eq!(item.subtitle.as_deref(), Some(ADD_USAGE));
        assert_eq!(item.autocomplete.as_deref(), Some("add "));
        assert!(!item.valid);

        let feedback = fixture
            .action()
            .run("add test2 https://test2.example.com")
            .await
            .unwrap();
        let item = &feedback.items()[0];
        assert_eq!(item.subtitle.as_deref(), Some(ADD_USAGE));
        assert_eq!(
            item.autocomplete.as_deref(),
            Some("add test2 https://test2.example.com ")
        );
    }

    #[tokio::test]
    async fn test_add_validation_messages() {
        let mut fixture = Fixture::new();

        let feedback = fixture.action().run("add test1").await.unwrap();
        assert_eq!(
            feedback.items()[0].subtitle.as_deref(),
            Some("Identifier test1 already exists")
        );

        let feedback = fixture.action().run("add test2 not-a-url").await.unwrap();
        assert_eq!(
            feedback.items()[0].subtitle.as_deref(),
            Some("Redmine URL not-a-url not valid")
        );

        // No user behind the api-key
        fixture.clients.insert("test2", Box::new(FakeRedmine::new()));
        let feedback = fixture
            .action()
            .run("add test2 https://test2.example.com badkey Test Two")
            .await
            .unwrap();
        let item = &feedback.items()[0];
        assert_eq!(item.subtitle.as_deref(), Some(CONNECTION_FAILED));
        assert!(!item.valid);
    }

    #[tokio::test]
    async fn test_add_complete_query() {
        let mut fixture = Fixture::new();
        fixture
            .clients
            .insert("test2", Box::new(FakeRedmine::new().with_user("jdoe")));

        let feedback = fixture
            .action()
            .run("add test2 https://test2.example.com key Test Two")
            .await
            .unwrap();
        let item = &feedback.items()[0];
        assert!(item.valid);
        assert_eq!(
            item.arg.as_deref(),
            Some("add test2 https://test2.example.com key Test Two")
        );
        assert_eq!(item.autocomplete, None);
    }

    #[tokio::test]
    async fn test_remove_prompts() {
        let mut fixture = Fixture::new();
        fixture
            .settings
            .add_server(&["test2", "https://test2.example.com", "key", "Test", "Two"])
            .unwrap();

        let feedback = fixture.action().run("remove test2").await.unwrap();
        assert_eq!(feedback.len(), 1);
        let item = &feedback.items()[0];
        assert_eq!(item.arg.as_deref(), Some("remove test2"));
        assert_eq!(item.subtitle.as_deref(), Some("Remove Test Two configuration"));
        assert!(item.valid);

        let feedback = fixture.action().run("remove").await.unwrap();
        assert_eq!(feedback.len(), 2);

        let feedback = fixture.action().run("remove 1").await.unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback.items()[0].title, "test1");
    }

    #[test]
    fn test_save_add_and_remove() {
        let mut fixture = Fixture::new();

        let message = fixture
            .action()
            .save("add test2 https://test2.example.com key Test Two")
            .unwrap();
        assert_eq!(message.as_deref(), Some("Configuration added"));
        assert_eq!(fixture.settings.server("test2").unwrap().name, "Test Two");

        let mut reloaded = Settings::new(fixture.dir.path().join("settings.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.server_count(), 2);

        fixture
            .cache
            .set_projects("test2", vec![project("alpha", "2024-01-01T00:00:00Z")]);
        fixture
            .clients
            .insert("test2", Box::new(FakeRedmine::new().with_user("jdoe")));
        let message = fixture.action().save("remove test2").unwrap();
        assert_eq!(message.as_deref(), Some("Configuration removed"));
        assert!(!fixture.settings.contains("test2"));
        assert!(!fixture.cache.has_projects("test2"));
        assert!(!fixture.clients.remove("test2"));
    }

    #[test]
    fn test_save_ignores_other_queries() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.action().save("").unwrap(), None);
        assert_eq!(fixture.action().save("clear-cache").unwrap(), None);
        assert_eq!(fixture.action().save("remove").unwrap(), None);
        assert!(fixture.action().save("add test2").unwrap_err().is_action());
    }
}
