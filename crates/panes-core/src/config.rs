// ABOUTME: Engine configuration handling.
// ABOUTME: Loads and saves layout tuning settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pixels reserved for the divider between two adjacent panes
    pub handle_width: i32,

    /// Smallest pane size (pixels) a divider drag may produce
    pub min_pane_size: i32,

    /// Pointer sampling rate while a divider is being dragged
    pub drag_poll_hz: u32,

    /// Maximum number of undo entries kept; oldest are dropped first
    pub history_limit: usize,

    /// Share given to the new pane when a split doesn't specify one
    pub default_split_ratio: f64,

    /// Optional hard cap on the number of panes
    pub max_panes: Option<usize>,

    /// Extra grab tolerance around dividers for hit testing
    pub divider_hit_slop: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            handle_width: 6,
            min_pane_size: 50,
            drag_poll_hz: 60,
            history_limit: 100,
            default_split_ratio: 0.5,
            max_panes: None,
            divider_hit_slop: 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl EngineConfig {
    /// Get the default config file path (~/.config/panes/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("panes").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.handle_width < 0 {
            return Err(ConfigError::Invalid {
                field: "handle_width",
                reason: format!("must not be negative, got {}", self.handle_width),
            });
        }
        if self.min_pane_size < 0 {
            return Err(ConfigError::Invalid {
                field: "min_pane_size",
                reason: format!("must not be negative, got {}", self.min_pane_size),
            });
        }
        if self.drag_poll_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "drag_poll_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.default_split_ratio > 0.0 && self.default_split_ratio < 1.0) {
            return Err(ConfigError::Invalid {
                field: "default_split_ratio",
                reason: format!("must be in (0, 1), got {}", self.default_split_ratio),
            });
        }
        Ok(())
    }

    /// Time between two pointer samples while dragging
    pub fn drag_poll_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.drag_poll_hz.max(1) as f64)
    }
}
