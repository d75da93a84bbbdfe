//! Configuration loading, validation, and management for promptbound.
//!
//! Loads configuration from `~/.promptbound/config.toml` with environment
//! variable overrides. Validates all settings at load time; a malformed
//! file is an error, never silently defaulted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use promptbound_core::error::ConfigError;

/// Environment variable overriding the API key.
pub const ENV_API_KEY: &str = "PROMPTBOUND_API_KEY";
/// Environment variable overriding the default model.
pub const ENV_MODEL: &str = "PROMPTBOUND_MODEL";
/// Environment variable pointing at a LiteLLM-style proxy. The name is
/// kept for compatibility with existing proxy deployments.
pub const ENV_PROXY_URL: &str = "LITELLM_PROXY_URL";

/// The root configuration structure.
///
/// Maps directly to `~/.promptbound/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default provider for execution
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model for execution
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Optional proxy URL; when set, the default provider's adapter is
    /// pointed at it instead of the provider's public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Dashboard output configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            proxy_url: None,
            providers: HashMap::new(),
            dashboard: DashboardConfig::default(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("proxy_url", &self.proxy_url)
            .field("providers", &self.providers)
            .field("dashboard", &self.dashboard)
            .finish()
    }
}

/// Per-provider configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Where run dashboards are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_dashboard_dir")]
    pub output_dir: String,
}

fn default_dashboard_dir() -> String {
    ".promptbound/copilot".into()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output_dir: default_dashboard_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config: AppConfig =
            toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, otherwise start from defaults.
    /// Environment overrides apply either way.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            if !model.is_empty() {
                self.default_model = model;
            }
        }
        if let Ok(url) = std::env::var(ENV_PROXY_URL) {
            if !url.is_empty() {
                self.proxy_url = Some(url);
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_provider.is_empty() {
            return Err(ConfigError::Invalid(
                "default_provider must not be empty".into(),
            ));
        }
        if self.default_model.is_empty() {
            return Err(ConfigError::Invalid(
                "default_model must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-3.5-turbo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_key = "sk-test"
default_provider = "anthropic"
default_model = "claude-3-sonnet"

[providers.anthropic]
api_key = "sk-ant-test"

[dashboard]
output_dir = "reports"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.default_provider, "anthropic");
        assert_eq!(config.default_model, "claude-3-sonnet");
        assert_eq!(
            config.providers["anthropic"].api_key.as_deref(),
            Some("sk-ant-test")
        );
        assert_eq!(config.dashboard.output_dir, "reports");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_provider = [not toml").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn empty_model_rejected() {
        let config = AppConfig {
            default_model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-very-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
