use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{DEFAULT_TEMPERATURE, REQUEST_TIMEOUT_SECS};
use crate::prompt::{Dialect, Tone};

/// Environment variable holding the completion service key
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variables holding the feedback service login
pub const ENV_TRUBRICS_EMAIL: &str = "TRUBRICS_EMAIL";
pub const ENV_TRUBRICS_PASSWORD: &str = "TRUBRICS_PASSWORD";

/// Problems detected in configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} not found in environment or keyring")]
    MissingCredential { var: &'static str },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion service settings (OpenAI-compatible)
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Feedback service settings
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the API, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens for the improved email
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API key (prefer OPENAI_API_KEY or the keyring)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Send feedback to the remote service when credentials are available
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_project")]
    pub project: String,
    /// Model name recorded alongside each rating
    #[serde(default = "default_model")]
    pub model: String,
    /// Password sign-in endpoint. It takes `{email, password, returnSecureToken}`
    /// and answers `{idToken}`, the shape of a Firebase-style identity service.
    /// The default is a placeholder: point it at the sign-in URL of your
    /// feedback deployment, including any API key query parameter it needs.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Endpoint that accepts thumbs records with the sign-in token as bearer.
    /// Placeholder default, like `auth_url`.
    #[serde(default = "default_feedback_url")]
    pub feedback_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            project: default_project(),
            model: default_model(),
            auth_url: default_auth_url(),
            feedback_url: default_feedback_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
    #[serde(default)]
    pub default_tone: Tone,
    #[serde(default)]
    pub default_dialect: Dialect,
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            default_tone: Tone::default(),
            default_dialect: Dialect::default(),
            default_temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Modern,
    Dark,
    #[serde(rename = "high-contrast")]
    HighContrast,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_project() -> String {
    "Email Improver".to_string()
}

// Placeholders until configured for a real feedback deployment
fn default_auth_url() -> String {
    "https://api.trubrics.com/v1/auth/login".to_string()
}

fn default_feedback_url() -> String {
    "https://api.trubrics.com/v1/feedback".to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("emailsmith");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })?)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Clamp values that the form cannot represent
    fn normalize(&mut self) {
        let t = self.ui.default_temperature;
        self.ui.default_temperature = if t.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            t.clamp(0.0, 1.0)
        };
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}
