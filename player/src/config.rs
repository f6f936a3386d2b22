use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stream_core::ResolverConfig;

/// Persistent settings for the terminal front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub resolver: ResolverConfig,
    /// Program that plays remote streams and local files
    pub player_command: String,
    /// Extra arguments passed before the source URL
    pub player_args: Vec<String>,
    /// Program that opens YouTube embed pages
    pub browser_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        let browser_command = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };

        Self {
            resolver: ResolverConfig::default(),
            player_command: "mpv".to_string(),
            player_args: Vec::new(),
            browser_command: browser_command.to_string(),
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stream-player").join("config.json"))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;

        Ok(settings)
    }

    /// Load settings, falling back to the defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }
}
