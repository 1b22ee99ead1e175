use serde::{Deserialize, Serialize};
use std::path::Path;
use trailfinder_core::config::{
    get_default_config_dir, load_toml_or_default, APP_NAME, DEFAULT_ENDPOINT_PATH,
    DEFAULT_LISTEN_ADDR,
};
use trailfinder_core::errors::GeminiResult;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the trail finder client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SiteConfig {
    pub proxy_url: Option<String>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl SiteConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GeminiResult<Self> {
        load_toml_or_default(path)
    }

    /// Loads `~/.config/trailfinder/site.toml`
    pub fn load_from_default() -> GeminiResult<Self> {
        let path = get_default_config_dir(APP_NAME)?.join("site.toml");
        Self::load_from_file(&path)
    }

    /// The proxy URL, defaulting to a locally running proxy daemon
    pub fn proxy_url(&self) -> String {
        self.proxy_url
            .clone()
            .unwrap_or_else(|| format!("http://{}{}", DEFAULT_LISTEN_ADDR, DEFAULT_ENDPOINT_PATH))
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}
