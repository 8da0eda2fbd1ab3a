//! Storage contracts shared by every backend.
//!
//! `EntryStore` is a plain keyed map of entries by date; it does not
//! enforce one-entry-per-date on its own (a `put` always overwrites).
//! `AssetStore` holds image bytes under deterministic paths. The two
//! never call each other; the scheduling service wires them together.

use crate::domain::{AssetKind, MuseEntry, ScheduleDate};
use crate::error::{MuseError, Result};

/// Lazy sequence of entries, newest date first. Call the listing method
/// again to restart it.
pub type EntryIter<'a> = Box<dyn Iterator<Item = Result<MuseEntry>> + 'a>;

/// Optional features a backend may offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// `put_if_absent` is a single atomic create rather than get-then-put
    pub conditional_create: bool,
}

/// Keyed persistence for entries
pub trait EntryStore {
    /// Short backend name for logs and errors
    fn backend(&self) -> &'static str;

    /// Absence is `Ok(None)`, never an error
    fn get(&self, date: ScheduleDate) -> Result<Option<MuseEntry>>;

    /// Unconditional upsert keyed by `entry.scheduled_date`
    fn put(&self, entry: &MuseEntry) -> Result<()>;

    /// Idempotent
    fn delete(&self, date: ScheduleDate) -> Result<()>;

    /// All entries, `scheduled_date` descending
    fn list_all(&self) -> Result<EntryIter<'_>>;

    /// Entries strictly before `date`, descending
    fn list_before(&self, date: ScheduleDate) -> Result<EntryIter<'_>> {
        let all = self.list_all()?;
        Ok(Box::new(all.filter(move |item| match item {
            Ok(entry) => entry.scheduled_date < date,
            Err(_) => true,
        })))
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::default()
    }

    /// Write only if no entry holds the date. Returns `false` when one
    /// already does. Without `conditional_create` this is a best-effort
    /// check followed by a write, and a concurrent writer can slip in
    /// between the two.
    fn put_if_absent(&self, entry: &MuseEntry) -> Result<bool> {
        if self.get(entry.scheduled_date)?.is_some() {
            return Ok(false);
        }
        self.put(entry)?;
        Ok(true)
    }
}

/// Binary storage for images, addressed by logical path
pub trait AssetStore {
    fn backend(&self) -> &'static str;

    /// Deterministic path for an entry's image. The same `(date, kind)`
    /// always maps to the same path so a repeated publish overwrites.
    fn path_for(&self, date: ScheduleDate, kind: AssetKind) -> String;

    /// Store bytes, overwriting silently. Returns the reference readers use.
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String>;

    fn get(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Idempotent; a missing path is not an error
    fn delete(&self, path: &str) -> Result<()>;

    /// Map a reference this store issued back to its path. References
    /// from anywhere else yield `None`.
    fn resolve_path(&self, reference: &str) -> Option<String>;

    /// Move an asset to a new path, returning the new reference.
    /// The default copies; the source is left for the caller to delete.
    fn relocate(&self, from: &str, to: &str) -> Result<String> {
        let bytes = self.get(from)?.ok_or_else(|| {
            MuseError::store_failure(self.backend(), format!("asset '{}' not found", from))
        })?;
        self.put(to, &bytes)
    }
}
