//! Configuration types and loading.
//!
//! Settings come from an optional TOML file; the API token may additionally
//! be supplied on the command line or through `GITHUB_TOKEN`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Name of the configuration file searched for in the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub API access.
    #[serde(default)]
    pub github: GitHubConfig,

    /// What the dashboard shows and where it writes reports.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Settings handed to [`GitHubClient`](crate::github::GitHubClient).
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    /// Personal access token; raises the rate limit from ~60 to ~5000 requests per hour.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Items requested per page on list endpoints (GitHub allows 1..=100).
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Maximum pages read from a list endpoint; `0` reads every page.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
        }
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("per_page", &self.per_page)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl GitHubConfig {
    /// Whether requests will be authenticated.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// The page cap, or `None` when every page should be read.
    pub fn page_limit(&self) -> Option<u32> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Contributors shown in the ranking chart and the report.
    #[serde(default = "default_top_contributors")]
    pub top_contributors: usize,

    /// Commits listed under "Recent Commits".
    #[serde(default = "default_recent_commits")]
    pub recent_commits: usize,

    /// Directory for CSV reports and saved charts; the working directory when unset.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_contributors: default_top_contributors(),
            recent_commits: default_recent_commits(),
            export_dir: None,
        }
    }
}

impl DisplayConfig {
    /// Directory reports are written to.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_user_agent() -> String {
    format!("ghstats/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_per_page() -> u8 {
    100
}

const fn default_max_pages() -> u32 {
    10
}

const fn default_top_contributors() -> usize {
    10
}

const fn default_recent_commits() -> usize {
    10
}

impl Config {
    /// Parse configuration from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from `path` when given, otherwise from the default
    /// location if a file exists there, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading configuration");
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::from_file(&path)
            }
            _ => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/ghstats/config.toml`, when the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ghstats").join(CONFIG_FILE_NAME))
    }

    /// Replace the file's token with one given on the command line or in the environment.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.github.token = Some(token);
        }
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let github = &self.github;
        if github.api_base.trim().is_empty() {
            return Err(Error::Config("github.api_base must not be empty".to_string()));
        }
        url::Url::parse(&github.api_base)
            .map_err(|e| Error::Config(format!("github.api_base is not a valid URL: {e}")))?;
        if github.timeout_secs == 0 {
            return Err(Error::Config("github.timeout_secs must be positive".to_string()));
        }
        if !(1..=100).contains(&github.per_page) {
            return Err(Error::Config(format!(
                "github.per_page must be between 1 and 100, got {}",
                github.per_page
            )));
        }
        if self.display.top_contributors == 0 {
            return Err(Error::Config(
                "display.top_contributors must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
