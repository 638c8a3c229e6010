// src/environment.rs
use crate::{adzuna, agent::chat, jobboard};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Runtime settings: endpoint bases and the model name. Credentials are never
/// configured here — they always come from the process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,
    #[serde(default = "default_jobboard_base_url")]
    pub jobboard_base_url: String,
    #[serde(default = "default_adzuna_base_url")]
    pub adzuna_base_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            llm_base_url: default_llm_base_url(),
            jobboard_base_url: default_jobboard_base_url(),
            adzuna_base_url: default_adzuna_base_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<RuntimeConfig>,
    #[serde(default)]
    production: Option<RuntimeConfig>,
}

impl RuntimeConfig {
    /// Load configuration based on environment. `config.yaml` is optional;
    /// every setting has a built-in default.
    pub fn load() -> Result<Self> {
        let environment = get_environment();
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            info!("No config.yaml found, using default configuration");
            return Ok(Self::default());
        }

        info!("Loading configuration for environment: {environment}");

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;
        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let config = match environment.as_str() {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(config.unwrap_or_default())
    }
}

fn get_environment() -> String {
    std::env::var("JOBSCOUT_ENV")
        .or_else(|_| std::env::var("ENVIRONMENT"))
        .or_else(|_| std::env::var("ENV"))
        .unwrap_or_else(|_| "local".to_string())
}

/// The language-model credential. Checked, not assumed: absence is an error
/// value, never a crash.
pub fn gemini_api_key() -> Result<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .context("GEMINI_API_KEY environment variable is not set.")
}

fn default_model() -> String {
    chat::DEFAULT_MODEL.to_string()
}

fn default_llm_base_url() -> String {
    chat::DEFAULT_BASE_URL.to_string()
}

fn default_jobboard_base_url() -> String {
    jobboard::DEFAULT_BASE_URL.to_string()
}

fn default_adzuna_base_url() -> String {
    adzuna::DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let file: ConfigFile = serde_yaml::from_str("local:\n  model: gemini-2.5-pro\n").unwrap();
        let config = file.local.unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.jobboard_base_url, jobboard::DEFAULT_BASE_URL);
        assert_eq!(config.adzuna_base_url, adzuna::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_sections_yield_defaults() {
        let file: ConfigFile = serde_yaml::from_str("{}").unwrap();
        assert!(file.local.is_none());
        assert!(file.production.is_none());
        let config = file.production.unwrap_or_default();
        assert_eq!(config.model, chat::DEFAULT_MODEL);
    }
}
