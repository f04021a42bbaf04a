//! Taskboard configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion endpoint configuration
    pub llm: LlmConfig,

    /// Translation endpoint configuration
    pub translate: TranslateConfig,

    /// File locations
    pub storage: StorageConfig,

    /// Terminal UI behaviour
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .taskboard.yml
        let local_config = PathBuf::from(".taskboard.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/taskboard/taskboard.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("taskboard").join("taskboard.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Completion model identifier
    pub model: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable that overrides the key stored in the state file
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Resolve the API key: environment first, then the stored key.
    pub fn api_key(&self, stored: &str) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(stored.trim().to_string()).filter(|k| !k.is_empty()))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo-instruct".to_string(),
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// Translation endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Base URL of the translation service
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Language topics are translated into before prompting the model
    #[serde(rename = "pivot-language")]
    pub pivot_language: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".to_string(),
            pivot_language: "en".to_string(),
            timeout_ms: 15_000,
        }
    }
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// State document; relative paths resolve against the data directory
    #[serde(rename = "data-file")]
    pub data_file: PathBuf,

    /// Directory holding `<locale>.txt` language packs
    #[serde(rename = "langs-dir")]
    pub langs_dir: PathBuf,

    /// Pack other packs are measured against
    #[serde(rename = "reference-language")]
    pub reference_language: String,
}

impl StorageConfig {
    /// Absolute location of the state document.
    pub fn data_path(&self) -> PathBuf {
        if self.data_file.is_absolute() {
            return self.data_file.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskboard")
            .join(&self.data_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
            langs_dir: PathBuf::from("langs"),
            reference_language: "en_US".to_string(),
        }
    }
}

/// Terminal UI behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds between autosaves
    #[serde(rename = "autosave-secs")]
    pub autosave_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { autosave_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.translate.pivot_language, "en");
        assert_eq!(config.ui.autosave_secs, 30);
        assert_eq!(config.storage.reference_language, "en_US");
        assert!(config.llm.base_url.starts_with("https://"));
    }

    #[test]
    fn test_yaml_overrides_keep_other_defaults() {
        let yaml = "llm:\n  model: my-model\n  timeout-ms: 500\nui:\n  autosave-secs: 5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.model, "my-model");
        assert_eq!(config.llm.timeout_ms, 500);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.ui.autosave_secs, 5);
        assert_eq!(config.storage.langs_dir, PathBuf::from("langs"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskboard.yml");
        fs::write(&path, "storage:\n  data-file: /tmp/board.json\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage.data_path(), PathBuf::from("/tmp/board.json"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/definitely/not/here.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_api_key_falls_back_to_stored() {
        let config = LlmConfig {
            api_key_env: "TASKBOARD_TEST_UNSET_KEY_VAR".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(config.api_key("sk-stored"), Some("sk-stored".to_string()));
        assert_eq!(config.api_key("  "), None);
    }
}
