//! Configuration management

use crate::error::{MuseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "public/data/muses";
pub const DEFAULT_PUBLIC_PREFIX: &str = "/data/muses";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_public_prefix() -> String {
    DEFAULT_PUBLIC_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where records and images live, relative to the site root
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// URL prefix readers use to fetch stored images
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Use create-if-absent writes when the backend supports them
    #[serde(default = "default_true")]
    pub conditional_writes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_password: Option<String>,
    pub created: DateTime<Utc>,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Config {
            data_dir: default_data_dir(),
            public_prefix: default_public_prefix(),
            conditional_writes: true,
            creator_password: None,
            created: Utc::now(),
        }
    }

    /// Load config from .muse/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(".muse").join("config.toml");

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MuseError::NotMuseDirectory(path.to_path_buf())
            } else {
                MuseError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| MuseError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .muse/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let muse_dir = path.join(".muse");
        let config_path = muse_dir.join("config.toml");

        if !muse_dir.exists() {
            fs::create_dir(&muse_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| MuseError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Absolute data directory for a site rooted at `root`
    pub fn data_dir_in(&self, root: &Path) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            root.join(&self.data_dir)
        }
    }

    /// Expected creator password; MUSE_CREATOR_PASSWORD wins over the file
    pub fn creator_password(&self) -> Option<String> {
        std::env::var("MUSE_CREATOR_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| self.creator_password.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
