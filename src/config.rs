//! Application configuration: API keys, model selection and timeouts

use crate::error::ConfigError;
use crate::paths::{get_care_data_path, get_config_path};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PLANTNET_KEY_ENV: &str = "PLANTNET_API_KEY";
pub const OPENROUTER_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub plantnet_api_key: Option<String>,
    #[serde(default = "default_plantnet_project")]
    pub plantnet_project: String,
    #[serde(default = "default_plantnet_base_url")]
    pub plantnet_base_url: String,
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,
    /// Defaults to `plant_care.json` in the app data directory
    #[serde(default)]
    pub care_data_path: Option<PathBuf>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_speaker")]
    pub user_speaker: String,
    #[serde(default = "default_plant_speaker")]
    pub plant_speaker: String,
}

fn default_plantnet_project() -> String {
    "all".to_string()
}

fn default_plantnet_base_url() -> String {
    "https://my-api.plantnet.org".to_string()
}

fn default_chat_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_speaker() -> String {
    "You".to_string()
}

fn default_plant_speaker() -> String {
    "Plant".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plantnet_api_key: None,
            plantnet_project: default_plantnet_project(),
            plantnet_base_url: default_plantnet_base_url(),
            openrouter_api_key: None,
            chat_model: default_chat_model(),
            openrouter_base_url: default_openrouter_base_url(),
            care_data_path: None,
            request_timeout_secs: default_request_timeout_secs(),
            user_speaker: default_user_speaker(),
            plant_speaker: default_plant_speaker(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the app data directory, then applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&get_config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads a config file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        info!("[config] Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content).map_err(io_err)
    }

    /// Non-empty API keys from the environment take precedence over the file
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(key) = non_empty(PLANTNET_KEY_ENV) {
            self.plantnet_api_key = Some(key);
        }
        if let Some(key) = non_empty(OPENROUTER_KEY_ENV) {
            self.openrouter_api_key = Some(key);
        }
    }

    pub fn care_data_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.care_data_path {
            Some(path) => Ok(path.clone()),
            None => get_care_data_path(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Shared HTTP client for the identification and chat services
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout())
            .build()?)
    }
}
