//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum characters of combined document text sent to the model
    pub max_context_chars: usize,

    /// Lower bound for placeholder values
    pub placeholder_min: f64,

    /// Upper bound for placeholder values
    pub placeholder_max: f64,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_context_chars == 0 {
            return Err("max_context_chars must be greater than 0".to_string());
        }
        if !self.placeholder_min.is_finite() || !self.placeholder_max.is_finite() {
            return Err("placeholder bounds must be finite".to_string());
        }
        if self.placeholder_min > self.placeholder_max {
            return Err("placeholder_min cannot exceed placeholder_max".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 50_000,
            placeholder_min: 0.0,
            placeholder_max: 1_000_000.0,
        }
    }
}
