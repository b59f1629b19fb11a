//! Configuration (layered: code > env > config file > defaults).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RagError;
use crate::models::DEFAULT_MODEL_ID;
use crate::orchestrator::OrchestratorConfig;
use crate::types::GenerationSettings;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings for the provider, the tool loop, sessions and the repository.
///
/// Resolution order:
/// 1. Values set in code after loading
/// 2. Environment variables (`.env` is read first when present)
/// 3. The TOML config file
/// 4. Built-in defaults
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub max_tool_rounds: usize,
    /// Exchanges kept per session.
    pub max_history: usize,
    pub repository_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL_ID.to_string(),
            max_tokens: 800,
            temperature: 0.0,
            max_tool_rounds: 2,
            max_history: 2,
            repository_url: None,
            request_timeout_secs: 120,
        }
    }
}

impl std::fmt::Debug for RagConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("max_history", &self.max_history)
            .field("repository_url", &self.repository_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl RagConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        config.apply_env();
        config
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, RagError> {
        toml::from_str(raw).map_err(|e| RagError::Configuration(format!("invalid config: {e}")))
    }

    /// Read a TOML file (no env overrides).
    pub fn from_file(path: &Path) -> Result<Self, RagError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Config file, then environment.
    ///
    /// Without an explicit path the default location is used when it exists.
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, RagError> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::new(),
            },
        };
        config.apply_env();
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Override fields from `ANTHROPIC_*` and `COURSE_RAG_*` variables.
    ///
    /// Numbers that fail to parse, or zero where a positive value is needed,
    /// are ignored.
    pub fn apply_env(&mut self) {
        if let Some(key) = env_string("ANTHROPIC_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = env_string("ANTHROPIC_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(model) = env_string("COURSE_RAG_MODEL") {
            self.model = model;
        }
        if let Some(v) = env_parse::<u32>("COURSE_RAG_MAX_TOKENS").filter(|v| *v > 0) {
            self.max_tokens = v;
        }
        if let Some(v) = env_parse::<f64>("COURSE_RAG_TEMPERATURE").filter(|v| v.is_finite()) {
            self.temperature = v;
        }
        if let Some(v) = env_parse::<usize>("COURSE_RAG_MAX_TOOL_ROUNDS").filter(|v| *v > 0) {
            self.max_tool_rounds = v;
        }
        if let Some(v) = env_parse::<usize>("COURSE_RAG_MAX_HISTORY").filter(|v| *v > 0) {
            self.max_history = v;
        }
        if let Some(url) = env_string("COURSE_RAG_REPOSITORY_URL") {
            self.repository_url = Some(url);
        }
        if let Some(v) = env_parse::<u64>("COURSE_RAG_REQUEST_TIMEOUT_SECS").filter(|v| *v > 0) {
            self.request_timeout_secs = v;
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_rounds: self.max_tool_rounds,
            settings: self.generation_settings(),
            request_timeout: self.request_timeout(),
        }
    }

    /// Repository base URL, required by anything that searches content.
    pub fn require_repository_url(&self) -> Result<&str, RagError> {
        self.repository_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RagError::Configuration("Missing COURSE_RAG_REPOSITORY_URL".into()))
    }
}

/// `<config dir>/course-rag/config.toml`, when a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "course-rag")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_only_present_keys() {
        let config = RagConfig::from_toml_str(
            r#"
            model = "claude-opus-4-20250514"
            max_tool_rounds = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.model, "claude-opus-4-20250514");
        assert_eq!(config.max_tool_rounds, 3);
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.max_history, 2);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        assert!(matches!(
            RagConfig::from_toml_str("max_tokens = \"lots\""),
            Err(RagError::Configuration(_))
        ));
    }

    #[test]
    fn orchestrator_config_follows_fields() {
        let config = RagConfig::new().with_max_tool_rounds(4);
        let orchestrator = config.orchestrator_config();
        assert_eq!(orchestrator.max_rounds, 4);
        assert_eq!(orchestrator.settings.max_tokens, Some(800));
        assert_eq!(orchestrator.request_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = RagConfig::new().with_api_key("sk-ant-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
