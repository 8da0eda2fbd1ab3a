//! Initialize site use case

use crate::error::Result;
use crate::infrastructure::{Config, FileSystemEntryStore, FileSystemRepository, SiteRepository};
use std::fs;
use std::path::Path;

/// Create `.muse/config.toml` and an empty data directory under `path`.
pub fn init(path: &Path, data_dir: Option<&Path>) -> Result<Config> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = FileSystemRepository::new(path.to_path_buf());
    repo.initialize()?;

    let mut config = Config::new();
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    repo.save_config(&config)?;

    let data_path = config.data_dir_in(path);
    fs::create_dir_all(&data_path)?;
    FileSystemEntryStore::new(data_path).rebuild_index()?;

    tracing::info!("initialized site at {}", path.display());
    Ok(config)
}
