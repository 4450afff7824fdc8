//! # Configuration
//!
//! Loads the bot's configuration from `data/config.yaml` and the environment.
//! The result is immutable after startup and shared by reference.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub forum: ForumConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Identity the bot posts under. Used for self-post suppression and mentions.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    #[serde(default = "default_identity")]
    pub identity: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
        }
    }
}

fn default_identity() -> String {
    "ExternalPointsBot".to_string()
}

/// Discourse API settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ForumConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_forum_timeout")]
    pub timeout_secs: u64,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_forum_timeout(),
        }
    }
}

fn default_forum_timeout() -> u64 {
    15
}

/// LLM used for free-form replies.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>, // e.g. "GEMINI_API_KEY"
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: None,
            api_key: None,
            api_key_env: None,
            timeout_secs: default_generation_timeout(),
            max_tokens: None,
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_generation_timeout() -> u64 {
    30
}

/// Switches between the command bot and the persona-only responder.
#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    /// Only answer posts that start with `/` or mention the bot.
    #[serde(default = "default_true")]
    pub require_trigger: bool,
    /// When false every answered post goes to the LLM.
    #[serde(default = "default_true")]
    pub commands_enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            require_trigger: true,
            commands_enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    #[serde(default)]
    pub backend: LedgerBackend,
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> String {
    "data/user_points.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_file() -> String {
    "data/bot.log".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Reads the YAML file if present, then applies process environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file parses to `null`, which should mean "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlays the deployment environment variables onto the file settings.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("DISCOURSE_URL") {
            self.forum.url = url;
        }
        if let Some(key) = non_empty("DISCOURSE_API_KEY") {
            self.forum.api_key = key;
        }
        if let Some(user) = non_empty("DISCOURSE_USER") {
            self.bot.identity = user;
        }
        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            self.generation.api_key = Some(key);
        }
        if let Some(bind) = non_empty("BIND_ADDR") {
            self.server.bind = bind;
        }
    }

    /// Checks required settings and normalises the forum URL.
    pub fn validate(mut self) -> Result<Self> {
        self.forum.url = self.forum.url.trim().trim_end_matches('/').to_string();
        if self.forum.url.is_empty() {
            bail!("forum.url is not set (config file or DISCOURSE_URL)");
        }
        if self.forum.api_key.trim().is_empty() {
            bail!("forum.api_key is not set (config file or DISCOURSE_API_KEY)");
        }
        if self.bot.identity.trim().is_empty() {
            bail!("bot.identity must not be empty");
        }
        Ok(self)
    }

    /// Resolves the generation key from the inline value or the named env var.
    pub fn generation_api_key(&self) -> Option<String> {
        self.generation
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.generation
                    .api_key_env
                    .as_ref()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|k| !k.trim().is_empty())
            })
    }
}
