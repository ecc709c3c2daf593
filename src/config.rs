use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app::UiOptions;

/// Looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "bakehouse.toml";

pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Application settings; every key is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api_url: String,
    pub page_size: usize,
    pub toast_seconds: u64,
    pub tick_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 5,
            toast_seconds: 5,
            tick_ms: 250,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Reads `explicit`, else `bakehouse.toml` in `dir` when present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = dir.join(CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }

    pub fn ui_options(&self) -> UiOptions {
        UiOptions::default()
            .with_page_size(self.page_size)
            .with_tick_rate(Duration::from_millis(self.tick_ms.max(10)))
            .with_toast_lifetime(Duration::from_secs(self.toast_seconds))
    }
}
