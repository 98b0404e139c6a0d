//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sheetfill_extractor::ExtractorConfig;
use sheetfill_llm::gemini;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model provider settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Extraction settings
    #[serde(default)]
    pub extraction: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which model backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    Gemini,
    /// No model; always use placeholder values
    None,
}

/// Model provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider backend
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key; `--api-key` / `GOOGLE_API_KEY` take precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sheetfill").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the default
    /// configuration; a missing file at an explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::path()?, false),
        };

        if !path.exists() {
            if explicit {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        config.extraction.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// API key from the command line/environment, else from the file.
    pub fn resolve_api_key(&self, cli_key: Option<&str>) -> Option<String> {
        cli_key
            .or(self.model.api_key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }
}

impl ModelConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_provider() -> ProviderKind {
    ProviderKind::Gemini
}

fn default_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    gemini::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    gemini::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.provider, ProviderKind::Gemini);
        assert_eq!(config.model.model, "gemini-2.5-flash");
        assert_eq!(config.extraction.max_context_chars, 50_000);
        assert!(config.settings.color);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [model]
            provider = "none"

            [extraction]
            placeholder_max = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(config.model.provider, ProviderKind::None);
        assert_eq!(config.model.timeout_secs, gemini::DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.extraction.placeholder_max, 10.0);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.format = OutputFormat::Json;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.settings.format, OutputFormat::Json);
        assert_eq!(loaded.model.api_key, None);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/sheetfill.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_extraction_section_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extraction]\nmax_context_chars = 0\n").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
    }

    #[test]
    fn test_api_key_precedence() {
        let mut config = Config::default();
        assert_eq!(config.resolve_api_key(None), None);

        config.model.api_key = Some("from-file".into());
        assert_eq!(config.resolve_api_key(None).as_deref(), Some("from-file"));
        assert_eq!(config.resolve_api_key(Some("from-env")).as_deref(), Some("from-env"));
        assert_eq!(config.resolve_api_key(Some("  ")), None);
    }
}
