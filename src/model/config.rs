use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ops::view::FilterMode;

/// Configuration from textimp.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene document to reconcile against (relative to the config file)
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Number of lines kept in the activity log
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
    /// Diagnostic log filter, e.g. "warn" or "textimp=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write diagnostics to this file instead of stderr
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            capacity: default_log_capacity(),
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_capacity() -> usize {
    6
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Initial filter mode
    #[serde(default)]
    pub filter: FilterMode,
    /// Apply the filter mode to search results too.
    /// Off by default: an active search scans every record.
    #[serde(default)]
    pub combine_search_with_filter: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Hex color overrides keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
