//! TOML configuration.
//!
//! ```toml
//! targets = ["capital"]
//!
//! [queries]
//! capital = "What is the capital of France?"
//!
//! [model]
//! dir = "model"
//!
//! [preprocess]
//! char_width = 16
//! tokenizer = "bert"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use passage_qa_core::models::DEFAULT_CHAR_WIDTH;

use crate::tokenizer::TOKENIZER_NAMES;

pub const DEFAULT_MODEL_URL: &str =
    "https://onnxzoo.blob.core.windows.net/models/opset_9/bidaf/bidaf.onnx";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub targets: Vec<String>,
    #[serde(default)]
    pub queries: HashMap<String, String>,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            file_name: default_file_name(),
            url: default_url(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl ModelConfig {
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}
fn default_file_name() -> String {
    "bidaf.onnx".to_string()
}
fn default_url() -> String {
    DEFAULT_MODEL_URL.to_string()
}
fn default_download_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreprocessConfig {
    #[serde(default = "default_char_width")]
    pub char_width: usize,
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            char_width: DEFAULT_CHAR_WIDTH,
            tokenizer: default_tokenizer(),
        }
    }
}

fn default_char_width() -> usize {
    DEFAULT_CHAR_WIDTH
}
fn default_tokenizer() -> String {
    "bert".to_string()
}

/// Everything a runtime needs besides the questions themselves.
#[derive(Debug, Clone, Default)]
pub struct RuntimeSettings {
    pub model: ModelConfig,
    pub preprocess: PreprocessConfig,
}

impl Config {
    /// Config with no targets, used by commands that only preprocess.
    pub fn minimal() -> Self {
        Self {
            targets: Vec::new(),
            queries: HashMap::new(),
            model: ModelConfig::default(),
            preprocess: PreprocessConfig::default(),
        }
    }

    pub fn settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            model: self.model.clone(),
            preprocess: self.preprocess.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    // Validate targets
    if config.targets.is_empty() {
        anyhow::bail!("targets must list at least one label");
    }
    for target in &config.targets {
        if !config.queries.contains_key(target) {
            anyhow::bail!("target '{}' has no entry in [queries]", target);
        }
    }

    // Validate preprocess
    if config.preprocess.char_width == 0 {
        anyhow::bail!("preprocess.char_width must be > 0");
    }
    if !TOKENIZER_NAMES.contains(&config.preprocess.tokenizer.as_str()) {
        anyhow::bail!(
            "Unknown tokenizer: '{}'. Must be one of: {}.",
            config.preprocess.tokenizer,
            TOKENIZER_NAMES.join(", ")
        );
    }

    // Validate model
    if config.model.file_name.trim().is_empty() {
        anyhow::bail!("model.file_name must not be empty");
    }
    if !(config.model.url.starts_with("http://") || config.model.url.starts_with("https://")) {
        anyhow::bail!("model.url must be an http:// or https:// URL");
    }
    if config.model.download_timeout_secs == 0 {
        anyhow::bail!("model.download_timeout_secs must be > 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_src)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(
            r#"
targets = ["capital"]

[queries]
capital = "What is the capital of France?"
"#,
        )
        .unwrap();
        assert_eq!(config.model.model_path(), PathBuf::from("model/bidaf.onnx"));
        assert_eq!(config.model.url, DEFAULT_MODEL_URL);
        assert_eq!(config.preprocess.char_width, 16);
        assert_eq!(config.preprocess.tokenizer, "bert");
    }

    #[test]
    fn test_missing_query_rejected() {
        let err = parse(
            r#"
targets = ["capital", "river"]

[queries]
capital = "What is the capital of France?"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'river'"));
    }

    #[test]
    fn test_empty_targets_rejected() {
        assert!(parse("targets = []").is_err());
    }

    #[test]
    fn test_zero_char_width_rejected() {
        let err = parse(
            r#"
targets = ["a"]

[queries]
a = "A?"

[preprocess]
char_width = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("char_width"));
    }

    #[test]
    fn test_unknown_tokenizer_rejected() {
        let err = parse(
            r#"
targets = ["a"]

[queries]
a = "A?"

[preprocess]
tokenizer = "punkt"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("punkt"));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = parse(
            r#"
targets = ["a"]

[queries]
a = "A?"

[model]
url = "ftp://example.com/bidaf.onnx"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("model.url"));
    }

    #[test]
    fn test_settings_carry_model_and_preprocess() {
        let config = parse(
            r#"
targets = ["a"]

[queries]
a = "A?"

[model]
dir = "/opt/models"
download_timeout_secs = 30

[preprocess]
char_width = 8
tokenizer = "whitespace"
"#,
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(
            settings.model.model_path(),
            PathBuf::from("/opt/models/bidaf.onnx")
        );
        assert_eq!(settings.model.download_timeout_secs, 30);
        assert_eq!(settings.preprocess.char_width, 8);
        assert_eq!(settings.preprocess.tokenizer, "whitespace");
    }
}
