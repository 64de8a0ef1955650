//! CLI configuration loading and management.

use lnpath_core::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Full configuration for the `lnpath` binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LnpathConfig {
    /// Channel graph snapshot settings.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Route query parameters.
    #[serde(default)]
    pub search: SearchConfig,

    /// Settings for `demo-pair`.
    #[serde(default)]
    pub demo: DemoConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Path to the channel graph JSON file.
    #[serde(default = "default_graph_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Number of node pairs to examine.
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,
    /// Pairs with this many paths or more are passed over.
    #[serde(default = "default_max_path_limit")]
    pub max_path_limit: usize,
    /// Longest path counted, in hops.
    #[serde(default = "default_cutoff")]
    pub cutoff: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_graph_path() -> PathBuf {
    PathBuf::from("dataset/graph_info.json")
}
fn default_max_pairs() -> usize {
    1000
}
fn default_max_path_limit() -> usize {
    1000
}
fn default_cutoff() -> usize {
    6
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            path: default_graph_path(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            max_pairs: default_max_pairs(),
            max_path_limit: default_max_path_limit(),
            cutoff: default_cutoff(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LnpathConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: LnpathConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
