//! Config management use case

use crate::error::{MuseError, Result};
use crate::infrastructure::{Config, FileSystemRepository, SiteRepository};
use std::path::PathBuf;

const KEYS: &str = "data_dir, public_prefix, conditional_writes, creator_password, created";

/// Service for reading and editing `.muse/config.toml`
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;

        match key {
            "data_dir" => Ok(config.data_dir.display().to_string()),
            "public_prefix" => Ok(config.public_prefix),
            "conditional_writes" => Ok(config.conditional_writes.to_string()),
            "creator_password" => Ok(mask(config.creator_password.as_deref())),
            "created" => Ok(config.created.to_rfc3339()),
            _ => Err(MuseError::Config(format!(
                "Unknown config key: '{}'. Valid keys are: {}",
                key, KEYS
            ))),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "data_dir" => {
                if value.trim().is_empty() {
                    return Err(MuseError::Config("data_dir cannot be empty".to_string()));
                }
                config.data_dir = PathBuf::from(value);
            }
            "public_prefix" => {
                config.public_prefix = value.trim_end_matches('/').to_string();
            }
            "conditional_writes" => {
                config.conditional_writes = value.parse().map_err(|_| {
                    MuseError::Config(format!(
                        "conditional_writes must be 'true' or 'false', got '{}'",
                        value
                    ))
                })?;
            }
            "creator_password" => {
                config.creator_password = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "created" => {
                return Err(MuseError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => {
                return Err(MuseError::Config(format!(
                    "Unknown config key: '{}'. Valid keys are: {}",
                    key, KEYS
                )));
            }
        }

        self.repository.save_config(&config)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Config> {
        self.repository.load_config()
    }
}

/// Passwords are never echoed back
pub fn mask(password: Option<&str>) -> String {
    match password {
        Some(_) => "********".to_string(),
        None => "(not set)".to_string(),
    }
}
