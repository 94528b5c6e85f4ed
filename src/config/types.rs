use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::sprint::default_references;
use crate::tracker::JiraSettings;

use super::cli::CliArgs;
use super::{env, toml};

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sprint-import.toml";
/// Default Jira project key.
pub const DEFAULT_PROJECT_KEY: &str = "SCRUM";
/// Default directory holding `sprint_*.md` files.
pub const DEFAULT_SPRINTS_DIR: &str = ".cursor/tasks/sprints";
/// Default pause between task creations, in seconds.
pub const DEFAULT_DELAY_SECS: f64 = 0.5;
/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default run log path.
pub const DEFAULT_LOG_FILE: &str = ".sprint-import/run.log";

/// A tracker project known to the tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectInfo {
    pub key: String,
    pub name: String,
    pub description: String,
    pub board_id: Option<String>,
}

/// Import configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Jira site root URL.
    pub jira_url: Option<String>,
    /// Account email for basic auth.
    pub jira_email: Option<String>,
    /// API token for basic auth.
    pub jira_api_token: Option<String>,
    /// Project issues are created in.
    pub project_key: String,
    /// Nest tasks under their epic via the `parent` field.
    pub link_parent: bool,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Directory holding sprint documents.
    pub sprints_dir: String,
    /// Pause after every task creation attempt, in seconds.
    pub delay_secs: f64,
    /// Run log path.
    pub log_file: String,
    /// Footer lines for task descriptions.
    pub references: Vec<String>,
    /// Known projects, from `[projects.<KEY>]` sections.
    pub projects: Vec<ProjectInfo>,
    /// Parse and preview only.
    pub dry_run: bool,
    /// Only these sprint numbers (empty means all).
    pub sprint_filter: Vec<u32>,
    /// Debug-level diagnostics.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_url: None,
            jira_email: None,
            jira_api_token: None,
            project_key: DEFAULT_PROJECT_KEY.to_string(),
            link_parent: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sprints_dir: DEFAULT_SPRINTS_DIR.to_string(),
            delay_secs: DEFAULT_DELAY_SECS,
            log_file: DEFAULT_LOG_FILE.to_string(),
            references: default_references(),
            projects: Vec::new(),
            dry_run: false,
            sprint_filter: Vec::new(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Precedence: CLI args > env vars > config file > defaults.
    ///
    /// An explicitly given config file must exist; the default one is optional.
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ref path) = cli_args.config {
            config.merge_from(&Self::load_from_file(path)?);
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            config.merge_from(&Self::load_from_file(DEFAULT_CONFIG_FILE)?);
        }

        config.apply_env();
        config.apply_cli(cli_args);

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        toml::load_from_file(path)
    }

    /// Parse TOML content into configuration.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        toml::parse_toml(content)
    }

    fn apply_env(&mut self) {
        env::apply_env(self);
    }

    /// Apply CLI arguments.
    pub(super) fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(ref url) = args.jira_url {
            self.jira_url = Some(url.clone());
        }
        if let Some(ref email) = args.email {
            self.jira_email = Some(email.clone());
        }
        if let Some(ref token) = args.api_token {
            self.jira_api_token = Some(token.clone());
        }
        if let Some(ref key) = args.project_key {
            self.project_key = key.clone();
        }
        if let Some(ref dir) = args.sprints_dir {
            self.sprints_dir = dir.clone();
        }
        if let Some(secs) = args.delay {
            self.delay_secs = secs;
        }
        if let Some(ref path) = args.log_file {
            self.log_file = path.clone();
        }
        if !args.sprints.is_empty() {
            self.sprint_filter = args.sprints.clone();
        }
        if args.dry_run {
            self.dry_run = true;
        }
        if args.link_parent {
            self.link_parent = true;
        }
        if args.verbose {
            self.verbose = true;
        }
    }

    /// Merge values from another config (for file-based config).
    fn merge_from(&mut self, other: &Self) {
        self.jira_url = other.jira_url.clone();
        self.jira_email = other.jira_email.clone();
        self.jira_api_token = other.jira_api_token.clone();
        self.project_key = other.project_key.clone();
        self.link_parent = other.link_parent;
        self.timeout_secs = other.timeout_secs;
        self.sprints_dir = other.sprints_dir.clone();
        self.delay_secs = other.delay_secs;
        self.log_file = other.log_file.clone();
        self.references = other.references.clone();
        self.projects = other.projects.clone();
    }

    /// Pause between task creations. Negative or non-finite delays mean none.
    pub fn pacing(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }

    /// Registry entry for a project key.
    pub fn project(&self, key: &str) -> Option<&ProjectInfo> {
        self.projects.iter().find(|p| p.key == key)
    }

    /// Display name of the active project, falling back to its key.
    pub fn project_name(&self) -> String {
        self.project(&self.project_key)
            .map(|p| p.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.project_key.clone())
    }

    /// Connection settings for the Jira client. Credentials have no defaults.
    pub fn jira_settings(&self) -> Result<JiraSettings, ConfigError> {
        let required = |value: &Option<String>, name: &'static str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ConfigError::Missing(name))
        };

        Ok(JiraSettings {
            base_url: required(&self.jira_url, "ATLASSIAN_URL")?,
            email: required(&self.jira_email, "ATLASSIAN_EMAIL")?,
            api_token: required(&self.jira_api_token, "ATLASSIAN_API_TOKEN")?,
            project_key: self.project_key.clone(),
            project_name: self.project_name(),
            link_parent: self.link_parent,
            timeout_secs: self.timeout_secs,
        })
    }

    /// Generate default sprint-import.toml content.
    pub fn default_toml() -> String {
        let references = default_references()
            .iter()
            .map(|r| format!("\"{}\"", r))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"# sprint-import configuration

[jira]
# url = "https://your-site.atlassian.net"
# email = "you@example.com"
# api_token = "..."
project_key = "{project_key}"
link_parent = false
timeout = {timeout}

[sources]
dir = "{dir}"

[sync]
delay = {delay}

[log]
file = "{log}"

[description]
references = [{references}]
"#,
            project_key = DEFAULT_PROJECT_KEY,
            timeout = DEFAULT_TIMEOUT_SECS,
            dir = DEFAULT_SPRINTS_DIR,
            delay = DEFAULT_DELAY_SECS,
            log = DEFAULT_LOG_FILE,
            references = references,
        )
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading config file.
    #[error("config I/O error: {0}")]
    Io(String),
    /// Parse error in config file.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A required setting has no value.
    #[error("missing required setting {0}")]
    Missing(&'static str),
}
