use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ClientError;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "restavo.toml";

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "RESTAVO_API_URL";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// City searched when the page first loads.
    pub default_city: String,
    /// How long a toast stays visible.
    pub toast_millis: u64,
    /// Nights between the default check-in and check-out on the search form.
    pub default_stay_nights: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout_secs: 3,
            request_timeout_secs: 15,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_city: "Dubai".to_string(),
            toast_millis: 3000,
            default_stay_nights: 3,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let config_str = fs::read_to_string(path)?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(s: &str) -> Result<Self, ClientError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise `restavo.toml` if it exists, otherwise
    /// defaults. `RESTAVO_API_URL` is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.base_url = url;
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ClientError::Config("api.base_url must not be empty".into()));
        }
        if self.ui.toast_millis == 0 {
            return Err(ClientError::Config("ui.toast_millis must be positive".into()));
        }
        Ok(())
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl UiConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_millis)
    }
}
