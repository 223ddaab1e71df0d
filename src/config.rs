use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Command-line character ceiling used when batching files into a single
/// exiftool invocation.
pub const DEFAULT_CHAR_LIMIT: usize = 50_000;

/// Process-scoped configuration for the extraction and write pipelines.
///
/// Loaded once, treated as read-only afterwards. Everything has a sensible
/// default, so a missing config file is not an error.
///
/// ```rust
/// use photo_meta::config::Config;
///
/// let mut config = Config::default();
/// config.char_limit = 10_000;
/// config.exiftool_bin = Some("/opt/local/bin/exiftool".into());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum rendered command-line length per exiftool invocation.
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,
    /// Explicit path to the exiftool binary. `None` searches PATH.
    #[serde(default)]
    pub exiftool_bin: Option<PathBuf>,
    /// Path to a custom raw-name → canonical-name column map (JSON).
    /// `None` uses the table embedded in the crate.
    #[serde(default)]
    pub column_map: Option<PathBuf>,
}

fn default_char_limit() -> usize {
    DEFAULT_CHAR_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            char_limit: DEFAULT_CHAR_LIMIT,
            exiftool_bin: None,
            column_map: None,
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe()?;
        let exe_dir = exe_path.parent().unwrap_or_else(|| Path::new("."));
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
