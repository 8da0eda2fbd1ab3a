//! Infrastructure layer - Storage backends, site discovery and configuration

pub mod config;
pub mod filesystem;
pub mod memory;
pub mod repository;
pub mod store;

pub use config::Config;
pub use filesystem::{FileSystemAssetStore, FileSystemEntryStore};
pub use memory::{MemoryAssetStore, MemoryEntryStore};
pub use repository::{FileSystemRepository, SiteRepository};
pub use store::{AssetStore, EntryIter, EntryStore, StoreCapabilities};
