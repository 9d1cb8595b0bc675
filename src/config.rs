use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::models::PageTarget;
use crate::scheduler::DailySchedule;
use crate::tracker::TrackerSettings;

/// Environment variable overriding the tracker account email
pub const EMAIL_ENV: &str = "SITEAUDIT_TRACKER_EMAIL";

/// Environment variable overriding the tracker API token
pub const API_TOKEN_ENV: &str = "SITEAUDIT_TRACKER_API_TOKEN";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Pages to audit, in the order they are audited
    #[serde(default)]
    pub pages: Vec<PageTarget>,

    /// Issue tracker connection
    pub tracker: Option<TrackerSettings>,

    /// Local time (HH:MM) at which to run every day
    pub daily_at: Option<String>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,
}

/// Fully resolved settings for a run
#[derive(Debug, Clone)]
pub struct Settings {
    pub pages: Vec<PageTarget>,
    /// `None` only in dry-run mode
    pub tracker: Option<TrackerSettings>,
    pub schedule: Option<DailySchedule>,
    pub output: String,
    pub verbose: bool,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("siteaudit.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let config_dir = config_home.join("siteaudit");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading configuration");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads the file named on the command line, or the first default one
    pub fn load(cli: &Cli) -> Result<Self> {
        match &cli.config {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Replaces tracker credentials with values from the environment, if set
    pub fn apply_env_overrides(&mut self) {
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };

        if let Some(email) = std::env::var(EMAIL_ENV).ok().filter(|v| !v.is_empty()) {
            tracker.email = email;
        }
        if let Some(token) = std::env::var(API_TOKEN_ENV).ok().filter(|v| !v.is_empty()) {
            tracker.api_token = token;
        }
    }

    /// Merge this configuration with CLI arguments and validate the result.
    /// CLI arguments take precedence over config file values.
    pub fn resolve(self, cli: &Cli) -> Result<Settings> {
        if self.pages.is_empty() {
            bail!("No pages configured: add at least one [[pages]] entry with a name and url");
        }

        for page in &self.pages {
            if !page.url.starts_with("http://") && !page.url.starts_with("https://") {
                bail!(
                    "Page '{}' has URL '{}': URL must start with http:// or https://",
                    page.name,
                    page.url
                );
            }
        }

        let tracker = if cli.dry_run {
            None
        } else {
            let tracker = self
                .tracker
                .context("No tracker configured: add a [tracker] section or pass --dry-run")?;
            if tracker.email.is_empty() || tracker.api_token.is_empty() {
                bail!(
                    "Tracker credentials missing: set email and api_token or {} and {}",
                    EMAIL_ENV,
                    API_TOKEN_ENV
                );
            }
            Some(tracker)
        };

        let schedule = cli
            .daily_at
            .as_deref()
            .or(self.daily_at.as_deref())
            .map(DailySchedule::parse)
            .transpose()?;

        Ok(Settings {
            pages: self.pages,
            tracker,
            schedule,
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.unwrap_or_else(|| cli.output.clone())
            },
            verbose: cli.verbose || self.verbose.unwrap_or(false),
        })
    }
}
