use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::LapchartError;
use crate::session::SessionRequest;

const CONFIG_DIR_NAME: &str = "lapchart";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_CACHE_DIR: &str = "cache_folder";
pub const DEFAULT_PROVIDER_URL: &str = "https://api.openf1.org/v1";
pub const DEFAULT_REQUEST_TIMEOUT_S: u64 = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory handed to the provider for its response cache
    pub cache_dir: PathBuf,
    pub provider_url: String,
    pub request_timeout_s: u64,
    /// Request shown in the dashboard form at startup
    pub last_request: SessionRequest,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            request_timeout_s: DEFAULT_REQUEST_TIMEOUT_S,
            last_request: SessionRequest::default(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads the config from the user's config directory, if there is one.
    /// An unreadable file is logged and ignored.
    pub fn from_local_file() -> Option<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }
        Self::from_path(&config_path)
            .map_err(|e| warn!("Ignoring config file {:?}: {}", config_path, e))
            .ok()
    }

    pub fn from_path(path: &Path) -> Result<Self, LapchartError> {
        let file = fs::File::open(path).map_err(|e| LapchartError::ConfigIOError { source: e })?;
        serde_json::from_reader(file).map_err(|e| LapchartError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), LapchartError> {
        let config_path = Self::config_path().ok_or(LapchartError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LapchartError> {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| LapchartError::ConfigIOError { source: e })?;
        }

        let file = fs::File::create(path).map_err(|e| LapchartError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| LapchartError::ConfigSerializeError { source: e })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_s)
    }
}

/// Creates the cache directory if it does not exist yet
pub fn ensure_cache_dir(path: &Path) -> Result<PathBuf, LapchartError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| LapchartError::CacheIO {
            path: format!("{:?}", path),
            source: e,
        })?;
    }
    Ok(path.to_path_buf())
}
