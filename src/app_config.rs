//! Client configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with LAPOR_)
//! 2. Config file (lapor.toml)
//! 3. Default values

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global client configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the complaint backend, without the `/api` suffix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Rows per page for staff listings
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 15,
            user_agent: format!("lapor/{}", env!("CARGO_PKG_VERSION")),
            page_size: 10,
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file backing the session store
    pub store_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: "./lapor-session.json".to_string(),
        }
    }
}

/// Attachment upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum attachment size in MB
    pub max_attachment_mb: u32,
    /// Lowercase extensions accepted as evidence
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_attachment_mb: 10,
            allowed_extensions: ["jpg", "jpeg", "png", "webp", "mp4", "mkv", "webm", "avi"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    pub fn max_attachment_bytes(&self) -> u64 {
        u64::from(self.max_attachment_mb) * 1024 * 1024
    }
}

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("lapor.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // Sections split on a double underscore since keys contain `_`
            // e.g., LAPOR_API__BASE_URL, LAPOR_UPLOAD__MAX_ATTACHMENT_MB
            .add_source(
                Environment::with_prefix("LAPOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reload configuration from file
    pub fn reload() -> Result<(), ConfigError> {
        let new_config = Self::load()?;
        if let Ok(mut config) = APP_CONFIG.write() {
            *config = new_config;
            log::info!("Configuration reloaded");
        }
        Ok(())
    }
}

/// Initialize client configuration
///
/// Reads `.env` if present, then triggers the lazy load and logs the result.
pub fn init() {
    dotenv::dotenv().ok();
    let base_url = get_config().api.base_url;
    log::info!("Configuration loaded: api.base_url = {}", base_url);
}

/// Get the current client configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Get backend connection configuration
pub fn api() -> ApiConfig {
    get_config().api
}

/// Get session configuration
pub fn session() -> SessionConfig {
    get_config().session
}

/// Get upload configuration
pub fn upload() -> UploadConfig {
    get_config().upload
}
