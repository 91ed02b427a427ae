//! Configuration loading and validation for Tutorius.
//!
//! Loads configuration from `~/.tutorius/config.toml` with environment
//! variable overrides. Every field has a default, so a missing file means
//! defaults rather than an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.tutorius/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every completion request
    #[serde(default = "default_model")]
    pub model: String,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Persona/curriculum table overrides
    #[serde(default)]
    pub curriculum: CurriculumConfig,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            database: DatabaseConfig::default(),
            curriculum: CurriculumConfig::default(),
        }
    }
}

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
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("database", &self.database)
            .field("curriculum", &self.curriculum)
            .finish()
    }
}

/// Where the SQLite progress store lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    AppConfig::config_dir()
        .join("tutorius.db")
        .to_string_lossy()
        .into_owned()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Optional TOML files merged into the built-in persona and curriculum
/// tables at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurriculumConfig {
    /// Extra personas (`[personas.<subject>]` tables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personas_file: Option<PathBuf>,

    /// Extra curriculum outlines (`[[outlines]]` tables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlines_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.tutorius/config.toml).
    ///
    /// Environment variable overrides:
    /// - `TUTORIUS_API_KEY` then `OPENROUTER_API_KEY` for the api key
    /// - `TUTORIUS_MODEL` for the model
    /// - `TUTORIUS_DB` for the database path
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("TUTORIUS_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("TUTORIUS_MODEL") {
            config.model = model;
        }

        if let Ok(path) = std::env::var("TUTORIUS_DB") {
            config.database.path = path;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tutorius")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "model".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert!(config.api_key.is_none());
        assert!(config.base_url.contains("openrouter.ai"));
        assert!(!config.model.is_empty());
        assert!(config.database.path.ends_with("tutorius.db"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn parses_a_full_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            api_key = "sk-or-v1-test"
            model = "anthropic/claude-sonnet-4"

            [database]
            path = "/tmp/test-tutorius.db"

            [curriculum]
            outlines_file = "/etc/tutorius/outlines.toml"
            "#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-or-v1-test"));
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.database.path, "/tmp/test-tutorius.db");
        assert_eq!(
            config.curriculum.outlines_file.as_deref(),
            Some(Path::new("/etc/tutorius/outlines.toml"))
        );
        // base_url untouched by the file keeps its default.
        assert!(config.base_url.contains("openrouter.ai"));
    }

    #[test]
    fn blank_model_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"model = "  ""#).unwrap();
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn debug_redacts_the_api_key() {
        let config = AppConfig {
            api_key: Some("sk-or-v1-very-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret"));
    }
}
