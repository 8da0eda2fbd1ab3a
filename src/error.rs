//! Error types for dailymuse

use crate::domain::{GenerationError, ScheduleDate};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableKind {
    /// The backend refused access (permissions, credentials)
    AccessDenied,
    /// Anything else: network, disk, unexpected backend state
    Unknown,
}

impl fmt::Display for UnavailableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableKind::AccessDenied => write!(f, "access denied"),
            UnavailableKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Main error type for dailymuse
#[derive(Debug, Error)]
pub enum MuseError {
    #[error("Not a muse directory: {0}")]
    NotMuseDirectory(PathBuf),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("An entry is already scheduled for {0}")]
    DateConflict(ScheduleDate),

    #[error("No entry scheduled for {0}")]
    EntryNotFound(ScheduleDate),

    #[error("Store unavailable ({backend}, {kind}): {detail}")]
    StoreUnavailable {
        backend: &'static str,
        kind: UnavailableKind,
        detail: String,
    },

    #[error("Malformed asset: {0}")]
    MalformedAsset(String),

    #[error("Corrupt record for {date}: {reason}")]
    CorruptRecord { date: String, reason: String },

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Creator authentication required")]
    NotAuthenticated,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl MuseError {
    /// Wrap an I/O failure from a storage backend
    pub fn store_io(backend: &'static str, err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => UnavailableKind::AccessDenied,
            _ => UnavailableKind::Unknown,
        };
        MuseError::StoreUnavailable {
            backend,
            kind,
            detail: err.to_string(),
        }
    }

    /// Backend failure with a free-form detail message
    pub fn store_failure(backend: &'static str, detail: impl Into<String>) -> Self {
        MuseError::StoreUnavailable {
            backend,
            kind: UnavailableKind::Unknown,
            detail: detail.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MuseError::NotMuseDirectory(_) => 2,
            MuseError::DateConflict(_) => 3,
            MuseError::EntryNotFound(_) => 4,
            MuseError::NotAuthenticated => 5,
            MuseError::StoreUnavailable { .. } => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            MuseError::NotMuseDirectory(path) => {
                format!(
                    "Not a muse directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'muse init' in this directory to create a new site\n\
                    • Navigate to an existing muse directory\n\
                    • Set MUSE_ROOT environment variable to your site path",
                    path.display()
                )
            }
            MuseError::InvalidDate(input) => {
                format!(
                    "Invalid date: '{}'\n\n\
                    Valid dates:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2024-06-01)",
                    input
                )
            }
            MuseError::DateConflict(date) => {
                format!(
                    "An entry is already scheduled for {}\n\n\
                    Suggestions:\n\
                    • Choose another date\n\
                    • Use 'muse show {}' to inspect the existing entry\n\
                    • Use 'muse reschedule {} <new-date>' to move it first",
                    date, date, date
                )
            }
            MuseError::EntryNotFound(date) => {
                format!(
                    "No entry scheduled for {}\n\n\
                    Suggestions:\n\
                    • Use 'muse list' to see scheduled entries",
                    date
                )
            }
            MuseError::NotAuthenticated => "Creator authentication required\n\n\
                Suggestions:\n\
                • Pass --password <password>\n\
                • Set MUSE_PASSWORD environment variable"
                .to_string(),
            MuseError::StoreUnavailable {
                kind: UnavailableKind::AccessDenied,
                ..
            } => {
                format!(
                    "{}\n\n\
                    Check that the data directory is writable by the current user.",
                    self
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using MuseError
pub type Result<T> = std::result::Result<T, MuseError>;
