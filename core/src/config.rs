use crate::errors::{GeminiError, GeminiResult};
use crate::types::DEFAULT_MODEL_NAME;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for the config directory
pub const APP_NAME: &str = "trailfinder";

/// Default path the proxy is served on
pub const DEFAULT_ENDPOINT_PATH: &str = "/.netlify/functions/gemini-proxy";

/// Default listen address of the proxy daemon
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8888";

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration struct for Gemini API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_MODEL_NAME.to_string()),
            api_base_url: None,
            temperature: None,
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    /// Whether a non-blank API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map_or(false, |key| !key.trim().is_empty())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            temperature: other.temperature.or(self.temperature),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }
}

/// Configuration for the proxy daemon
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ProxyConfig {
    pub listen_addr: Option<String>,
    pub endpoint_path: Option<String>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl ProxyConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        load_toml_or_default(path)
    }

    /// Loads `~/.config/trailfinder/proxy.toml`
    pub fn load_from_default() -> GeminiResult<Self> {
        let path = get_default_config_dir(APP_NAME)?.join("proxy.toml");
        Self::load_from_file(&path)
    }

    /// Reads `.env` and the process environment for the API key.
    pub fn apply_process_env(&mut self) {
        dotenvy::dotenv().ok();
        self.apply_env_overrides(|name| std::env::var(name).ok());
    }

    /// Overrides the API key from the first non-blank variable in [`API_KEY_ENV_VARS`].
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_ENV_VARS
            .into_iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
        {
            self.gemini.api_key = Some(key);
        }
    }

    pub fn listen_addr(&self) -> &str {
        self.listen_addr.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR)
    }

    pub fn endpoint_path(&self) -> &str {
        self.endpoint_path.as_deref().unwrap_or(DEFAULT_ENDPOINT_PATH)
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            listen_addr: other.listen_addr.clone().or_else(|| self.listen_addr.clone()),
            endpoint_path: other
                .endpoint_path
                .clone()
                .or_else(|| self.endpoint_path.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            gemini: self.gemini.merge(&other.gemini),
        }
    }
}

/// Reads a TOML file into `T`, or returns `T::default()` if the file does not exist.
pub fn load_toml_or_default<T>(path: &Path) -> GeminiResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| GeminiError::ConfigError(format!("Failed to read config file: {}", e)))?;

    toml::from_str(&content)
        .map_err(|e| GeminiError::ConfigError(format!("Failed to parse config file: {}", e)))
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GeminiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GeminiError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}
