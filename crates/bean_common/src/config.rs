//! Advisor configuration
//!
//! Presentation preferences only; the knowledge base itself is not
//! configurable. Config file: ~/.config/bean-advisor/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "BEAN_ADVISOR_CONFIG";

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    /// Emit JSON instead of text reports
    #[serde(default)]
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            json: false,
        }
    }
}

/// Diagnosis report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisConfig {
    /// How many ranked pests a report shows
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Hide results below this confidence (percent)
    #[serde(default)]
    pub min_confidence: f64,
}

fn default_top_k() -> usize {
    3
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_confidence: 0.0,
        }
    }
}

/// Main advisor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub diagnosis: DiagnosisConfig,
}

impl AdvisorConfig {
    /// User config path: $XDG_CONFIG_HOME/bean-advisor/config.toml or
    /// ~/.config/bean-advisor/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("bean-advisor").join("config.toml"))
    }

    /// Path that `load` reads and `save` writes
    ///
    /// Priority:
    /// 1. $BEAN_ADVISOR_CONFIG
    /// 2. User config path
    pub fn config_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::user_config_path(),
        }
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AdvisorConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Load from a path, using defaults when the file is missing or broken
    pub fn load_from_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring unusable configuration: {:#}", err);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Apply a `key=value` assignment
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", assignment))?;
        let (key, value) = (key.trim(), value.trim());

        match key {
            "output.color" => self.set_color_mode(value)?,
            "output.json" => {
                self.output.json = parse_bool(value)
                    .with_context(|| format!("Invalid value for output.json: '{}'", value))?;
            }
            "diagnosis.top_k" => {
                let top_k: usize = value
                    .parse()
                    .with_context(|| format!("Invalid value for diagnosis.top_k: '{}'", value))?;
                if top_k == 0 {
                    anyhow::bail!("diagnosis.top_k must be at least 1");
                }
                self.diagnosis.top_k = top_k;
            }
            "diagnosis.min_confidence" => {
                let min: f64 = value.parse().with_context(|| {
                    format!("Invalid value for diagnosis.min_confidence: '{}'", value)
                })?;
                if !(0.0..=100.0).contains(&min) {
                    anyhow::bail!("diagnosis.min_confidence must be within 0-100, got {}", min);
                }
                self.diagnosis.min_confidence = min;
            }
            _ => anyhow::bail!(
                "Unknown config key '{}'. Valid keys: output.color, output.json, \
                 diagnosis.top_k, diagnosis.min_confidence",
                key
            ),
        }
        Ok(())
    }

    pub fn set_color_mode(&mut self, mode: &str) -> Result<()> {
        self.output.color = match mode.to_lowercase().as_str() {
            "auto" => ColorMode::Auto,
            "always" | "on" | "yes" | "true" => ColorMode::Always,
            "never" | "off" | "no" | "false" | "none" => ColorMode::Never,
            _ => anyhow::bail!("Invalid color mode: '{}'. Valid values: auto, always, never", mode),
        };
        Ok(())
    }

    fn check(&self) -> Result<()> {
        let min = self.diagnosis.min_confidence;
        if !(0.0..=100.0).contains(&min) {
            anyhow::bail!("diagnosis.min_confidence must be within 0-100, got {}", min);
        }
        if self.diagnosis.top_k == 0 {
            anyhow::bail!("diagnosis.top_k must be at least 1");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.output.color, ColorMode::Auto);
        assert!(!config.output.json);
        assert_eq!(config.diagnosis.top_k, 3);
        assert_eq!(config.diagnosis.min_confidence, 0.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AdvisorConfig = toml::from_str("[diagnosis]\nmin_confidence = 20.0\n").unwrap();
        assert_eq!(config.diagnosis.top_k, 3);
        assert_eq!(config.diagnosis.min_confidence, 20.0);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_set_values() {
        let mut config = AdvisorConfig::default();
        config.set("output.color=never").unwrap();
        assert_eq!(config.output.color, ColorMode::Never);
        config.set("output.json = yes").unwrap();
        assert!(config.output.json);
        config.set("diagnosis.top_k=5").unwrap();
        assert_eq!(config.diagnosis.top_k, 5);
        config.set("diagnosis.min_confidence=12.5").unwrap();
        assert_eq!(config.diagnosis.min_confidence, 12.5);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = AdvisorConfig::default();
        assert!(config.set("output.color").is_err());
        assert!(config.set("output.color=purple").is_err());
        assert!(config.set("diagnosis.top_k=0").is_err());
        assert!(config.set("diagnosis.top_k=many").is_err());
        assert!(config.set("diagnosis.min_confidence=150").is_err());
        assert!(config.set("nope=1").is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AdvisorConfig::default();
        config.set("diagnosis.top_k=1").unwrap();
        config.set("output.color=always").unwrap();
        config.save_to(&path).unwrap();

        let loaded = AdvisorConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[diagnosis]\ntop_k = 0\n").unwrap();
        assert!(AdvisorConfig::load_from(&path).is_err());

        fs::write(&path, "not toml [").unwrap();
        assert!(AdvisorConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_load_or_default_recovers_from_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(AdvisorConfig::load_from_or_default(&path), AdvisorConfig::default());

        fs::write(&path, "not toml [").unwrap();
        let mut config = AdvisorConfig::load_from_or_default(&path);
        assert_eq!(config, AdvisorConfig::default());

        // The recovered config can be repaired and written back
        config.set("diagnosis.top_k=2").unwrap();
        config.save_to(&path).unwrap();
        assert_eq!(AdvisorConfig::load_from(&path).unwrap().diagnosis.top_k, 2);

        fs::write(&path, "[diagnosis]\ntop_k = 4\n").unwrap();
        assert_eq!(AdvisorConfig::load_from_or_default(&path).diagnosis.top_k, 4);
    }
}
