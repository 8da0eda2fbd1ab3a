//! In-memory backends.
//!
//! Entries are kept as serialized JSON text, the same form the file
//! backend writes, so reads go through the same record normalization.
//! Both stores can be told to fail writes or deletes, which is how the
//! partial-failure paths of the scheduling service are exercised.

use crate::domain::{AssetKind, MuseEntry, ScheduleDate};
use crate::error::{MuseError, Result};
use crate::infrastructure::store::{AssetStore, EntryIter, EntryStore, StoreCapabilities};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

const ENTRY_BACKEND: &str = "memory";
const ASSET_BACKEND: &str = "memory-assets";
const REF_SCHEME: &str = "memory://";

fn lock<'a, T>(backend: &'static str, mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| MuseError::store_failure(backend, "store lock poisoned"))
}

fn parse_record(date: ScheduleDate, raw: &str) -> Result<MuseEntry> {
    serde_json::from_str(raw).map_err(|e| MuseError::CorruptRecord {
        date: date.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    records: Mutex<BTreeMap<ScheduleDate, String>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert raw record text, bypassing serialization
    pub fn insert_raw(&self, date: ScheduleDate, raw: impl Into<String>) -> Result<()> {
        lock(ENTRY_BACKEND, &self.records)?.insert(date, raw.into());
        Ok(())
    }

    /// Raw record text as stored
    pub fn raw(&self, date: ScheduleDate) -> Result<Option<String>> {
        Ok(lock(ENTRY_BACKEND, &self.records)?.get(&date).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn check_put(&self) -> Result<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(MuseError::store_failure(ENTRY_BACKEND, "write rejected"));
        }
        Ok(())
    }

    fn serialize(entry: &MuseEntry) -> Result<String> {
        serde_json::to_string_pretty(entry)
            .map_err(|e| MuseError::store_failure(ENTRY_BACKEND, e.to_string()))
    }
}

impl EntryStore for MemoryEntryStore {
    fn backend(&self) -> &'static str {
        ENTRY_BACKEND
    }

    fn get(&self, date: ScheduleDate) -> Result<Option<MuseEntry>> {
        let raw = lock(ENTRY_BACKEND, &self.records)?.get(&date).cloned();
        raw.map(|raw| parse_record(date, &raw)).transpose()
    }

    fn put(&self, entry: &MuseEntry) -> Result<()> {
        self.check_put()?;
        let raw = Self::serialize(entry)?;
        lock(ENTRY_BACKEND, &self.records)?.insert(entry.scheduled_date, raw);
        Ok(())
    }

    fn delete(&self, date: ScheduleDate) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MuseError::store_failure(ENTRY_BACKEND, "delete rejected"));
        }
        lock(ENTRY_BACKEND, &self.records)?.remove(&date);
        Ok(())
    }

    fn list_all(&self) -> Result<EntryIter<'_>> {
        let snapshot: Vec<(ScheduleDate, String)> = lock(ENTRY_BACKEND, &self.records)?
            .iter()
            .rev()
            .map(|(date, raw)| (*date, raw.clone()))
            .collect();

        Ok(Box::new(snapshot.into_iter().filter_map(|(date, raw)| {
            match parse_record(date, &raw) {
                Ok(entry) => Some(Ok(entry)),
                Err(e) => {
                    tracing::warn!("skipping unreadable record {}: {}", date, e);
                    None
                }
            }
        })))
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities {
            conditional_create: true,
        }
    }

    fn put_if_absent(&self, entry: &MuseEntry) -> Result<bool> {
        self.check_put()?;
        let raw = Self::serialize(entry)?;
        let mut records = lock(ENTRY_BACKEND, &self.records)?;
        if records.contains_key(&entry.scheduled_date) {
            return Ok(false);
        }
        records.insert(entry.scheduled_date, raw);
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects
            .lock()
            .map(|o| o.contains_key(path))
            .unwrap_or(false)
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

impl AssetStore for MemoryAssetStore {
    fn backend(&self) -> &'static str {
        ASSET_BACKEND
    }

    fn path_for(&self, date: ScheduleDate, kind: AssetKind) -> String {
        format!("muses/{}/{}", date, kind.slug())
    }

    fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(MuseError::store_failure(ASSET_BACKEND, "upload rejected"));
        }
        lock(ASSET_BACKEND, &self.objects)?.insert(path.to_string(), bytes.to_vec());
        Ok(format!("{}{}", REF_SCHEME, path))
    }

    fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(lock(ASSET_BACKEND, &self.objects)?.get(path).cloned())
    }

    fn delete(&self, path: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MuseError::store_failure(ASSET_BACKEND, "delete rejected"));
        }
        lock(ASSET_BACKEND, &self.objects)?.remove(path);
        Ok(())
    }

    fn resolve_path(&self, reference: &str) -> Option<String> {
        reference
            .strip_prefix(REF_SCHEME)
            .filter(|path| !path.is_empty())
            .map(str::to_string)
    }
}
