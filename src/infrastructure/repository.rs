//! Site root discovery and configuration storage

use crate::error::{MuseError, Result};
use crate::infrastructure::filesystem::{FileSystemAssetStore, FileSystemEntryStore};
use crate::infrastructure::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Abstract repository for site-level operations
pub trait SiteRepository {
    /// Get the root directory of this site
    fn root(&self) -> &Path;

    /// Load configuration from .muse/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .muse/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .muse directory exists
    fn is_initialized(&self) -> bool;

    /// Create .muse directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of SiteRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Find the site root: MUSE_ROOT if set, otherwise walk up from the
    /// current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("MUSE_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_muse_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            }
            return Err(MuseError::Config(format!(
                "MUSE_ROOT is set to '{}' but no .muse directory found. \
                Run 'muse init' in that directory or unset MUSE_ROOT.",
                path.display()
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Walk up from `start` until a directory containing `.muse` is found
    pub fn discover_from(start: &Path) -> Result<Self> {
        start
            .ancestors()
            .find(|dir| Self::has_muse_dir(dir))
            .map(|dir| FileSystemRepository::new(dir.to_path_buf()))
            .ok_or_else(|| MuseError::NotMuseDirectory(start.to_path_buf()))
    }

    fn has_muse_dir(path: &Path) -> bool {
        path.join(".muse").is_dir()
    }

    /// Entry and asset stores for this site, both rooted at the configured
    /// data directory
    pub fn open_stores(&self, config: &Config) -> (FileSystemEntryStore, FileSystemAssetStore) {
        let data_dir = config.data_dir_in(&self.root);
        (
            FileSystemEntryStore::new(data_dir.clone()),
            FileSystemAssetStore::new(data_dir, config.public_prefix.clone()),
        )
    }
}

impl SiteRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_muse_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let muse_dir = self.root.join(".muse");

        if muse_dir.exists() {
            return Err(MuseError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&muse_dir)?;
        Ok(())
    }
}
