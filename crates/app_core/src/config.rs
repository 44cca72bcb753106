//! Application configuration

use crate::AppError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub layout: LayoutConfig,
    pub status: StatusConfig,
    pub keybindings: HashMap<String, Vec<String>>,
    /// Extensions shown with the executable icon
    pub executables: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            layout: LayoutConfig::default(),
            status: StatusConfig::default(),
            keybindings: default_keybindings(),
            executables: vec!["fx2".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Directory opened at activation; the working directory when unset
    pub start_dir: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Pocket File Manager".to_string(),
            start_dir: None,
        }
    }
}

/// Screen geometry, in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Path/breadcrumb bar at the top
    pub header_height: u32,
    /// One list row; icons are drawn at this size
    pub row_height: u32,
    /// Info panel / command bar below the list
    pub info_height: u32,
    /// Status line at the bottom
    pub status_height: u32,
    /// Icon slots kept beyond the visible rows
    pub icon_slack: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            screen_width: 256,
            screen_height: 192,
            header_height: 12,
            row_height: 16,
            info_height: 24,
            status_height: 12,
            icon_slack: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Ticks a status message stays up
    pub duration_ticks: u32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { duration_ticks: 180 }
    }
}

impl AppConfig {
    /// Load configuration, writing the defaults out on first run
    pub fn load_or_create() -> Result<Self, AppError> {
        Self::load_or_create_at(&Self::config_path())
    }

    fn load_or_create_at(path: &Path) -> Result<Self, AppError> {
        let result = if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path).map(|()| config)
        };
        result.map_err(|e| AppError::Config(format!("{}: {:#}", path.display(), e)))
    }

    /// Load configuration from file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "PocketFiler", "PocketFiler")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}

fn default_keybindings() -> HashMap<String, Vec<String>> {
    let mut kb = HashMap::new();

    kb.insert("app.back".into(), vec!["B".into()]);
    kb.insert("app.toggle_views".into(), vec!["Select".into()]);

    kb.insert("dialog.accept".into(), vec!["A".into()]);
    kb.insert("dialog.cancel".into(), vec!["X".into()]);

    kb.insert("nav.scroll_up".into(), vec!["Up".into()]);
    kb.insert("nav.scroll_down".into(), vec!["Down".into()]);
    kb.insert("nav.page_up".into(), vec!["L".into()]);
    kb.insert("nav.page_down".into(), vec!["R".into()]);
    kb.insert("nav.parent".into(), vec!["Left".into()]);

    kb
}
