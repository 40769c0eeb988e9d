//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with GREENHOUSE_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like database passwords and API keys should be kept in environment
//! variables, not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Greenhouse".to_string(),
            description: "Centre of Entrepreneurship blog and staff directory".to_string(),
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:5000"
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Session cookie lifetime in minutes (default: 24 hours)
    pub session_timeout_minutes: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 1440,
        }
    }
}

/// Content limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in MB per file
    pub max_upload_size_mb: u32,
    /// Maximum number of image files accepted per request
    pub max_image_files: usize,
    /// Maximum number of video files accepted per request
    pub max_video_files: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 50,
            max_image_files: 10,
            max_video_files: 5,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend: "local" or "cloudinary"
    pub backend: String,
    /// Local storage path (used when backend = "local")
    pub local_path: String,
    /// Cloudinary cloud name (used when backend = "cloudinary")
    pub cloudinary_cloud_name: String,
    /// Cloudinary API key
    pub cloudinary_api_key: String,
    /// Cloudinary API secret (should be in env var
    /// GREENHOUSE_STORAGE_CLOUDINARY_API_SECRET)
    #[serde(default)]
    pub cloudinary_api_secret: String,
    /// Folder hint passed with every Cloudinary upload
    pub cloudinary_folder: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            local_path: "./uploads".to_string(),
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            cloudinary_folder: "entrepreneurship-blog".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub limits: LimitsConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file (optional)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // Override with environment variables (GREENHOUSE_ prefix)
            // e.g., GREENHOUSE_STORAGE_BACKEND, GREENHOUSE_SITE_NAME
            .add_source(
                Environment::with_prefix("GREENHOUSE")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Initialize application configuration
///
/// This triggers the lazy loading of the config file and logs the result.
/// Should be called early in application startup.
pub fn init() {
    let config = APP_CONFIG.read().unwrap();
    log::info!("Configuration loaded: site.name = {}", config.site.name);
}

// Convenience functions for accessing global config

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

/// Get site configuration
pub fn site() -> SiteConfig {
    get_config().site
}

/// Get security configuration
pub fn security() -> SecurityConfig {
    get_config().security
}

/// Get limits configuration
pub fn limits() -> LimitsConfig {
    get_config().limits
}

/// Get storage configuration
pub fn storage() -> StorageConfig {
    get_config().storage
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.site.name, "Greenhouse");
        assert_eq!(config.storage.backend, "local");
        assert_eq!(config.limits.max_upload_size_mb, 50);
        assert_eq!(config.security.session_timeout_minutes, 1440);
    }

    #[test]
    fn test_load_from_toml_file() {
        // Create a temporary config file
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[site]
name = "Test Blog"
base_url = "https://test.example.com"

[server]
bind = "127.0.0.1:8088"

[storage]
backend = "cloudinary"
cloudinary_cloud_name = "demo"
cloudinary_api_key = "key123"

[limits]
max_upload_size_mb = 10
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.site.name, "Test Blog");
        assert_eq!(config.site.base_url, "https://test.example.com");
        assert_eq!(config.server.bind, "127.0.0.1:8088");
        assert_eq!(config.storage.backend, "cloudinary");
        assert_eq!(config.storage.cloudinary_cloud_name, "demo");
        assert_eq!(config.storage.cloudinary_api_key, "key123");
        assert_eq!(config.limits.max_upload_size_mb, 10);
        // Defaults should still apply for unspecified values
        assert_eq!(config.limits.max_image_files, 10);
        assert_eq!(config.storage.cloudinary_folder, "entrepreneurship-blog");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/config.toml").unwrap();
        assert_eq!(config.site.name, "Greenhouse");
        assert_eq!(config.storage.local_path, "./uploads");
    }
}
