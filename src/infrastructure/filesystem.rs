//! Flat-file backends: one JSON record per date plus image files, all in
//! one directory that a static site can serve as-is.
//!
//! Layout of the data directory:
//! - `<date>.json`          entry record
//! - `index.json`           JSON array of dates, newest first
//! - `<date>-<kind>.jpg`    images

use crate::domain::{AssetKind, MuseEntry, ScheduleDate};
use crate::error::{MuseError, Result};
use crate::infrastructure::store::{AssetStore, EntryIter, EntryStore, StoreCapabilities};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ENTRY_BACKEND: &str = "filesystem";
const ASSET_BACKEND: &str = "filesystem-assets";
const INDEX_FILE: &str = "index.json";

/// Replace `path` by writing a sibling temp file, syncing it, then renaming
/// it into place.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_name = format!(
        "{}.muse-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("record"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    let mut tmp = File::create(&tmp_path)?;
    tmp.write_all(contents)?;
    tmp.sync_all()?;
    drop(tmp);

    if cfg!(windows) && path.exists() {
        // rename does not replace an existing file on Windows
        fs::remove_file(path)?;
    }
    fs::rename(&tmp_path, path)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Entry records as `<date>.json` files with an ordered index
#[derive(Debug, Clone)]
pub struct FileSystemEntryStore {
    dir: PathBuf,
}

impl FileSystemEntryStore {
    pub fn new(dir: PathBuf) -> Self {
        FileSystemEntryStore { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, date: ScheduleDate) -> PathBuf {
        self.dir.join(format!("{}.json", date))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn io_err(e: io::Error) -> MuseError {
        MuseError::store_io(ENTRY_BACKEND, e)
    }

    fn serialize(entry: &MuseEntry) -> Result<String> {
        serde_json::to_string_pretty(entry)
            .map_err(|e| MuseError::store_failure(ENTRY_BACKEND, e.to_string()))
    }

    /// Dates listed in the index, newest first. A missing or unreadable
    /// index is rebuilt from the records on disk.
    pub fn read_index(&self) -> Result<Vec<ScheduleDate>> {
        let raw = match fs::read_to_string(self.index_path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.rebuild_index(),
            Err(e) => return Err(Self::io_err(e)),
        };

        match serde_json::from_str::<Vec<ScheduleDate>>(&raw) {
            Ok(mut dates) => {
                normalize_index(&mut dates);
                Ok(dates)
            }
            Err(e) => {
                tracing::warn!("index.json unreadable ({}), rebuilding", e);
                self.rebuild_index()
            }
        }
    }

    fn write_index(&self, dates: &[ScheduleDate]) -> Result<()> {
        let raw = serde_json::to_string_pretty(dates)
            .map_err(|e| MuseError::store_failure(ENTRY_BACKEND, e.to_string()))?;
        write_atomic(&self.index_path(), raw.as_bytes()).map_err(Self::io_err)
    }

    fn update_index<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<ScheduleDate>),
    {
        let mut dates = self.read_index()?;
        change(&mut dates);
        normalize_index(&mut dates);
        self.write_index(&dates)
    }

    /// Scan the directory for `<date>.json` records and rewrite the index.
    /// Returns the indexed dates, newest first.
    pub fn rebuild_index(&self) -> Result<Vec<ScheduleDate>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut dates = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                MuseError::store_failure(ENTRY_BACKEND, format!("scan failed: {}", e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(stem) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
            else {
                continue;
            };
            if let Ok(date) = ScheduleDate::parse(stem) {
                dates.push(date);
            }
        }

        normalize_index(&mut dates);
        self.write_index(&dates)?;
        tracing::info!("rebuilt index with {} entries", dates.len());
        Ok(dates)
    }
}

fn normalize_index(dates: &mut Vec<ScheduleDate>) {
    dates.sort_by(|a, b| b.cmp(a));
    dates.dedup();
}

impl EntryStore for FileSystemEntryStore {
    fn backend(&self) -> &'static str {
        ENTRY_BACKEND
    }

    fn get(&self, date: ScheduleDate) -> Result<Option<MuseEntry>> {
        let raw = match fs::read_to_string(self.record_path(date)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_err(e)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| MuseError::CorruptRecord {
                date: date.to_string(),
                reason: e.to_string(),
            })
    }

    fn put(&self, entry: &MuseEntry) -> Result<()> {
        let raw = Self::serialize(entry)?;
        write_atomic(&self.record_path(entry.scheduled_date), raw.as_bytes())
            .map_err(Self::io_err)?;
        self.update_index(|dates| dates.push(entry.scheduled_date))
    }

    fn delete(&self, date: ScheduleDate) -> Result<()> {
        remove_if_present(&self.record_path(date)).map_err(Self::io_err)?;
        self.update_index(|dates| dates.retain(|d| *d != date))
    }

    fn list_all(&self) -> Result<EntryIter<'_>> {
        let dates = self.read_index()?;

        Ok(Box::new(dates.into_iter().filter_map(move |date| {
            match self.get(date) {
                Ok(Some(entry)) => Some(Ok(entry)),
                Ok(None) => {
                    tracing::warn!("index lists {} but no record exists", date);
                    None
                }
                Err(MuseError::CorruptRecord { date, reason }) => {
                    tracing::warn!("skipping unreadable record {}: {}", date, reason);
                    None
                }
                Err(e) => Some(Err(e)),
            }
        })))
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities {
            conditional_create: true,
        }
    }

    fn put_if_absent(&self, entry: &MuseEntry) -> Result<bool> {
        let raw = Self::serialize(entry)?;
        let path = self.record_path(entry.scheduled_date);
        fs::create_dir_all(&self.dir).map_err(Self::io_err)?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(Self::io_err(e)),
        };
        let written = file
            .write_all(raw.as_bytes())
            .and_then(|_| file.sync_all());
        if let Err(e) = written {
            // Don't leave a truncated record holding the date
            let _ = fs::remove_file(&path);
            return Err(Self::io_err(e));
        }

        self.update_index(|dates| dates.push(entry.scheduled_date))?;
        Ok(true)
    }
}

/// Images as files next to the records, served under `public_prefix`
#[derive(Debug, Clone)]
pub struct FileSystemAssetStore {
    dir: PathBuf,
    public_prefix: String,
}

impl FileSystemAssetStore {
    pub fn new(dir: PathBuf, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        FileSystemAssetStore { dir, public_prefix }
    }

    fn file_path(&self, path: &str) -> PathBuf {
        self.dir.join(path)
    }

    fn reference_for(&self, path: &str) -> String {
        format!("{}/{}", self.public_prefix, path)
    }

    fn io_err(e: io::Error) -> MuseError {
        MuseError::store_io(ASSET_BACKEND, e)
    }
}

/// A single plain file name: no separators, no parent references
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Records, the index and in-flight temp files share the directory with
/// images but are never assets
fn is_asset_file_name(name: &str) -> bool {
    is_plain_file_name(name) && !name.ends_with(".json") && !name.contains(".muse-tmp-")
}

impl AssetStore for FileSystemAssetStore {
    fn backend(&self) -> &'static str {
        ASSET_BACKEND
    }

    fn path_for(&self, date: ScheduleDate, kind: AssetKind) -> String {
        format!("{}-{}.jpg", date, kind.slug())
    }

    fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        write_atomic(&self.file_path(path), bytes).map_err(Self::io_err)?;
        Ok(self.reference_for(path))
    }

    fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.file_path(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(e)),
        }
    }

    fn delete(&self, path: &str) -> Result<()> {
        remove_if_present(&self.file_path(path)).map_err(Self::io_err)
    }

    fn resolve_path(&self, reference: &str) -> Option<String> {
        let rest = reference.strip_prefix(&self.public_prefix)?;
        let name = rest.strip_prefix('/')?;
        is_asset_file_name(name).then(|| name.to_string())
    }

    fn relocate(&self, from: &str, to: &str) -> Result<String> {
        let source = self.file_path(from);
        if !source.exists() {
            return Err(MuseError::store_failure(
                ASSET_BACKEND,
                format!("asset '{}' not found", from),
            ));
        }
        let target = self.file_path(to);
        if cfg!(windows) && target.exists() {
            fs::remove_file(&target).map_err(Self::io_err)?;
        }
        fs::rename(&source, &target).map_err(Self::io_err)?;
        Ok(self.reference_for(to))
    }
}
