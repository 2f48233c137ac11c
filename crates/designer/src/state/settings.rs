//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::scene::{project_dirs, DEFAULT_HISTORY_LIMIT};
use crate::error::DesignResult;
use crate::export::{is_valid_solid_name, SOLID_NAME};

/// Environment override for the chat server URL
pub const SERVER_URL_ENV: &str = "DESIGNER_SERVER_URL";

/// Undo history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of stored snapshots
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// STL export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Name written after `solid` / `endsolid`
    pub solid_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            solid_name: SOLID_NAME.to_string(),
        }
    }
}

/// Assistant chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Base URL of the designer server
    pub server_url: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3001".to_string(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    pub history: HistorySettings,
    pub export: ExportSettings,
    pub chat: ChatSettings,
}

impl AppSettings {
    /// Settings file location: `<config dir>/settings.json`
    pub fn path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`; a missing or unreadable file gives the defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(&json) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the config file, returning where they went
    pub fn save(&self) -> DesignResult<Option<PathBuf>> {
        let Some(path) = Self::path() else {
            return Ok(None);
        };
        self.save_to(&path)?;
        Ok(Some(path))
    }

    pub fn save_to(&self, path: &Path) -> DesignResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Replace values that would produce broken output with their defaults
    fn validated(mut self) -> Self {
        if !is_valid_solid_name(&self.export.solid_name) {
            tracing::warn!(
                "Invalid solid name {:?} in settings, using {:?}",
                self.export.solid_name,
                SOLID_NAME
            );
            self.export.solid_name = SOLID_NAME.to_string();
        }
        if self.history.limit == 0 {
            tracing::warn!("History limit 0 in settings, using {}", DEFAULT_HISTORY_LIMIT);
            self.history.limit = DEFAULT_HISTORY_LIMIT;
        }
        self
    }

    /// Chat server URL, honoring `DESIGNER_SERVER_URL`
    pub fn chat_server_url(&self) -> String {
        std::env::var(SERVER_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.chat.server_url.clone())
    }
}
