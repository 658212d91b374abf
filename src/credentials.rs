use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::config::{
    Config, ConfigError, ENV_OPENAI_API_KEY, ENV_TRUBRICS_EMAIL, ENV_TRUBRICS_PASSWORD,
};

const KEYRING_SERVICE: &str = "emailsmith";

/// Debug information about credential storage backends
#[derive(Debug, Clone)]
pub struct CredentialDebugInfo {
    pub keyring_available: bool,
    pub env_vars: Vec<(&'static str, bool)>,
    pub keyring_entries: Vec<(&'static str, bool)>,
    pub config_path: Option<PathBuf>,
    pub config_exists: bool,
}

impl fmt::Display for CredentialDebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Credential Storage Status:")?;
        writeln!(
            f,
            "  Keyring: {}",
            if self.keyring_available {
                "available"
            } else {
                "unavailable"
            }
        )?;
        for (var, set) in &self.env_vars {
            writeln!(
                f,
                "  Environment var ({}): {}",
                var,
                if *set { "set" } else { "not set" }
            )?;
        }
        for (var, stored) in &self.keyring_entries {
            writeln!(
                f,
                "  Keyring entry ({}): {}",
                var,
                if *stored { "stored" } else { "missing" }
            )?;
        }
        match &self.config_path {
            Some(path) => {
                writeln!(f, "  Config file: {}", path.display())?;
                writeln!(f, "  Config exists: {}", self.config_exists)?;
            }
            None => writeln!(f, "  Config file: no config directory")?,
        }
        Ok(())
    }
}

/// Login for the feedback service
#[derive(Clone)]
pub struct FeedbackCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for FeedbackCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Secrets resolved at startup. Never reloaded.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub feedback: Option<FeedbackCredentials>,
    /// Feedback login variables that resolved to nothing
    pub missing_feedback_vars: Vec<&'static str>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("feedback", &self.feedback)
            .finish()
    }
}

impl Credentials {
    /// Resolve each secret: environment first, then keyring, then config file
    /// (completion key only). Empty values count as absent.
    pub fn from_sources(
        env_lookup: impl Fn(&str) -> Option<String>,
        keyring_lookup: impl Fn(&str) -> Option<String>,
        config: &Config,
    ) -> Self {
        let resolve = |var: &str| {
            non_empty(env_lookup(var)).or_else(|| non_empty(keyring_lookup(var)))
        };

        let openai_api_key =
            resolve(ENV_OPENAI_API_KEY).or_else(|| non_empty(config.completion.api_key.clone()));

        let email = resolve(ENV_TRUBRICS_EMAIL);
        let password = resolve(ENV_TRUBRICS_PASSWORD);
        let missing_feedback_vars = [
            (ENV_TRUBRICS_EMAIL, email.is_none()),
            (ENV_TRUBRICS_PASSWORD, password.is_none()),
        ]
        .into_iter()
        .filter_map(|(var, missing)| missing.then_some(var))
        .collect();

        let feedback = email
            .zip(password)
            .map(|(email, password)| FeedbackCredentials { email, password });

        Self {
            openai_api_key,
            feedback,
            missing_feedback_vars,
        }
    }

    /// Missing secrets worth warning about at startup
    pub fn warnings(&self, feedback_enabled: bool) -> Vec<ConfigError> {
        let mut warnings = Vec::new();
        if self.openai_api_key.is_none() {
            warnings.push(ConfigError::MissingCredential {
                var: ENV_OPENAI_API_KEY,
            });
        }
        if feedback_enabled && self.feedback.is_none() {
            warnings.extend(
                self.missing_feedback_vars
                    .iter()
                    .map(|&var| ConfigError::MissingCredential { var }),
            );
        }
        warnings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Access to secrets in the environment and the OS keyring
pub struct CredentialStore;

impl CredentialStore {
    pub const SECRETS: [&'static str; 3] =
        [ENV_OPENAI_API_KEY, ENV_TRUBRICS_EMAIL, ENV_TRUBRICS_PASSWORD];

    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, config: &Config) -> Credentials {
        Credentials::from_sources(
            |var| env::var(var).ok(),
            |var| self.keyring_get(var),
            config,
        )
    }

    /// Get diagnostic info about credential storage backend
    pub fn debug_info(&self) -> CredentialDebugInfo {
        // Check if keyring is available
        let keyring_available =
            if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, "__probe__") {
                entry.set_password("__test__").is_ok()
                    && entry.get_password().is_ok()
                    && entry.delete_credential().is_ok()
            } else {
                false
            };

        let env_vars = Self::SECRETS
            .iter()
            .map(|var| (*var, non_empty(env::var(var).ok()).is_some()))
            .collect();
        let keyring_entries = Self::SECRETS
            .iter()
            .map(|var| (*var, self.keyring_get(var).is_some()))
            .collect();

        let config_path = Config::config_path().ok();
        let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

        CredentialDebugInfo {
            keyring_available,
            env_vars,
            keyring_entries,
            config_path,
            config_exists,
        }
    }

    /// Try to get a secret from the keyring
    fn keyring_get(&self, key: &str) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, key).ok()?;
        non_empty(entry.get_password().ok())
    }

    /// Store a secret in the keyring
    pub fn set_secret(&self, key: &str, value: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, key)
            .with_context(|| format!("Failed to open keyring entry for {}", key))?;
        entry
            .set_password(value)
            .with_context(|| format!("Failed to store {} in keyring", key))?;
        tracing::info!("Stored {} in keyring", key);
        Ok(())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_takes_precedence_over_keyring() {
        let creds = Credentials::from_sources(
            lookup(&[(ENV_OPENAI_API_KEY, "sk-env")]),
            lookup(&[(ENV_OPENAI_API_KEY, "sk-keyring")]),
            &Config::default(),
        );
        assert_eq!(creds.openai_api_key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_keyring_then_config_fallback() {
        let mut config = Config::default();
        config.completion.api_key = Some("sk-config".to_string());

        let creds = Credentials::from_sources(
            lookup(&[(ENV_OPENAI_API_KEY, "   ")]),
            lookup(&[(ENV_OPENAI_API_KEY, "sk-keyring")]),
            &config,
        );
        assert_eq!(creds.openai_api_key.as_deref(), Some("sk-keyring"));

        let creds = Credentials::from_sources(lookup(&[]), lookup(&[]), &config);
        assert_eq!(creds.openai_api_key.as_deref(), Some("sk-config"));
    }

    #[test]
    fn test_feedback_needs_both_email_and_password() {
        let creds = Credentials::from_sources(
            lookup(&[(ENV_TRUBRICS_EMAIL, "me@example.com")]),
            lookup(&[]),
            &Config::default(),
        );
        assert!(creds.feedback.is_none());

        let creds = Credentials::from_sources(
            lookup(&[(ENV_TRUBRICS_EMAIL, "me@example.com")]),
            lookup(&[(ENV_TRUBRICS_PASSWORD, "pw")]),
            &Config::default(),
        );
        let feedback = creds.feedback.unwrap();
        assert_eq!(feedback.email, "me@example.com");
        assert_eq!(feedback.password, "pw");
    }

    #[test]
    fn test_missing_key_warning() {
        let creds = Credentials::from_sources(lookup(&[]), lookup(&[]), &Config::default());
        let warnings = creds.warnings(true);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].to_string().contains(ENV_OPENAI_API_KEY));

        assert_eq!(creds.warnings(false).len(), 1);
    }

    #[test]
    fn test_warning_names_the_absent_feedback_variable() {
        let creds = Credentials::from_sources(
            lookup(&[
                (ENV_OPENAI_API_KEY, "sk-env"),
                (ENV_TRUBRICS_EMAIL, "me@example.com"),
            ]),
            lookup(&[]),
            &Config::default(),
        );
        let warnings: Vec<String> = creds.warnings(true).iter().map(|w| w.to_string()).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with(ENV_TRUBRICS_PASSWORD));
        assert!(!warnings[0].contains(ENV_TRUBRICS_EMAIL));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = Credentials {
            openai_api_key: Some("sk-very-secret".to_string()),
            feedback: Some(FeedbackCredentials {
                email: "me@example.com".to_string(),
                password: "hunter2".to_string(),
            }),
            missing_feedback_vars: Vec::new(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-very-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("me@example.com"));
    }
}
