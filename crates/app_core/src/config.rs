//! Application configuration

use crate::AppError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_RECENT: usize = 10;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub general: GeneralConfig,
    pub thumbnails: ThumbnailConfig,
    pub viewer: ViewerConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Catalog opened at start-up
    pub auto_open: Option<PathBuf>,
    pub recent_databases: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Bounding square of a generated thumbnail, in pixels
    pub size: u32,
    /// Records decoded in parallel before being committed in order
    pub batch_size: usize,
    /// Cache capacity; `None` keeps every thumbnail for the session
    pub max_entries: Option<usize>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            size: 128,
            batch_size: 8,
            max_entries: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Downscale bound for the enlarged rendering
    pub max_display_size: Option<(u32, u32)>,
    /// Decode every frame of animated media; otherwise only the first
    pub enable_animation: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_display_size: None,
            enable_animation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub pool_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { pool_size: 4 }
    }
}

impl CatalogConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("org", "Candle", "Candle")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Move `path` to the front of the recent list
    pub fn remember_database(&mut self, path: &Path) {
        let recent = &mut self.general.recent_databases;
        recent.retain(|p| p != path);
        recent.insert(0, path.to_path_buf());
        recent.truncate(MAX_RECENT);
    }
}
