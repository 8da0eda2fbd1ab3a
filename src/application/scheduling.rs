//! Publish, reschedule and remove entries.
//!
//! Each operation spans the entry store and the asset store with no
//! transaction between them, so the order of steps is what keeps the
//! visible state sane after a partial failure:
//! - conflicts are checked before anything is written;
//! - a moved entry is written at its new date before the old record is
//!   deleted, so a crash leaves it duplicated rather than lost;
//! - stale-asset cleanup never fails an operation. Problems are reported
//!   as [`CleanupWarning`]s next to the result.

use crate::domain::{asset_codec, AssetKind, EntryDraft, ImageRef, MuseEntry, ScheduleDate};
use crate::error::{MuseError, Result};
use crate::infrastructure::{AssetStore, EntryStore};
use chrono::Utc;
use std::fmt;

/// A best-effort cleanup step that did not go through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupWarning {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not delete asset '{}': {}", self.path, self.reason)
    }
}

/// A successful result plus any non-fatal cleanup failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<CleanupWarning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Outcome {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Source of `createdAt` stamps, in milliseconds since the epoch
pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    Utc::now().timestamp_millis()
}

/// An asset moved during a reschedule
struct MovedAsset {
    from: String,
    to: String,
    reference: String,
}

/// The only write path for entries
pub struct SchedulingService<'a> {
    entries: &'a dyn EntryStore,
    assets: &'a dyn AssetStore,
    conditional_create: bool,
    clock: Clock,
}

impl<'a> SchedulingService<'a> {
    /// Wire the two stores together, probing the entry store for
    /// conditional-create support
    pub fn new(entries: &'a dyn EntryStore, assets: &'a dyn AssetStore) -> Self {
        let capabilities = entries.capabilities();
        tracing::debug!(
            "entry store '{}' conditional create: {}",
            entries.backend(),
            capabilities.conditional_create
        );
        SchedulingService {
            entries,
            assets,
            conditional_create: capabilities.conditional_create,
            clock: system_clock,
        }
    }

    /// Fall back to check-then-write even when the store could do better
    pub fn without_conditional_writes(mut self) -> Self {
        self.conditional_create = false;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn uses_conditional_create(&self) -> bool {
        self.conditional_create
    }

    /// Create a new entry at a date that must be free.
    ///
    /// Inline images are uploaded to their deterministic paths and the
    /// record stores the returned references. If the record write fails
    /// after an upload, the uploaded asset stays behind; a retried
    /// publish to the same date overwrites it.
    pub fn publish(&self, draft: EntryDraft) -> Result<Outcome<MuseEntry>> {
        validate_draft(&draft)?;
        let date = draft.scheduled_date;

        if self.entries.get(date)?.is_some() {
            return Err(MuseError::DateConflict(date));
        }

        // Decode everything up front so a bad image fails before any write
        let mut uploads = Vec::new();
        for kind in AssetKind::ALL {
            if let ImageRef::Inline(raw) = draft.image(kind) {
                uploads.push((kind, asset_codec::decode(raw)?));
            }
        }

        let mut entry = draft.into_entry((self.clock)());
        for (kind, bytes) in uploads {
            let path = self.assets.path_for(date, kind);
            let reference = self.assets.put(&path, &bytes)?;
            entry.set_image(kind, ImageRef::External(reference));
        }

        if self.conditional_create {
            if !self.entries.put_if_absent(&entry)? {
                tracing::warn!("{} was taken while publishing", date);
                return Err(MuseError::DateConflict(date));
            }
        } else {
            self.entries.put(&entry)?;
        }

        tracing::info!("published '{}' for {}", entry.title, date);
        Ok(Outcome::new(entry))
    }

    /// Move the entry at `old` to `new`, carrying its stored images along.
    pub fn reschedule(&self, old: ScheduleDate, new: ScheduleDate) -> Result<Outcome<()>> {
        if old == new {
            return Ok(Outcome::new(()));
        }

        let mut entry = self
            .entries
            .get(old)?
            .ok_or(MuseError::EntryNotFound(old))?;
        if self.entries.get(new)?.is_some() {
            return Err(MuseError::DateConflict(new));
        }

        let moved = self.migrate_assets(&mut entry, new)?;
        entry.scheduled_date = new;

        let written = if self.conditional_create {
            self.entries.put_if_absent(&entry).and_then(|created| {
                if created {
                    Ok(())
                } else {
                    Err(MuseError::DateConflict(new))
                }
            })
        } else {
            self.entries.put(&entry)
        };
        if let Err(e) = written {
            self.roll_back(&moved);
            return Err(e);
        }

        if let Err(e) = self.entries.delete(old) {
            tracing::error!(
                "entry now exists at both {} and {}; removing the old record failed: {}",
                new,
                old,
                e
            );
            return Err(e);
        }

        let mut outcome = Outcome::new(());
        for asset in &moved {
            if asset.from != asset.to {
                self.delete_best_effort(&asset.from, &mut outcome.warnings);
            }
        }

        tracing::info!("rescheduled {} -> {}", old, new);
        Ok(outcome)
    }

    /// Delete the entry at `date` and its images. Returns whether an
    /// entry was there; removing nothing is not an error.
    pub fn remove(&self, date: ScheduleDate) -> Result<Outcome<bool>> {
        let referenced = match self.entries.get(date) {
            Ok(Some(entry)) => self.owned_paths(&entry),
            Ok(None) => return Ok(Outcome::new(false)),
            Err(MuseError::CorruptRecord { reason, .. }) => {
                tracing::warn!("removing unreadable record {}: {}", date, reason);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        // Also sweep the deterministic paths, which may hold an orphan
        // from an earlier failed publish
        let mut paths = referenced;
        for kind in AssetKind::ALL {
            let path = self.assets.path_for(date, kind);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        let mut outcome = Outcome::new(true);
        for path in &paths {
            self.delete_best_effort(path, &mut outcome.warnings);
        }

        self.entries.delete(date)?;
        tracing::info!("removed entry for {}", date);
        Ok(outcome)
    }

    /// Asset paths this store owns among the entry's image references
    fn owned_paths(&self, entry: &MuseEntry) -> Vec<String> {
        let mut paths = Vec::new();
        for kind in AssetKind::ALL {
            if let ImageRef::External(reference) = entry.image(kind) {
                if let Some(path) = self.assets.resolve_path(reference) {
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
        }
        paths
    }

    /// Relocate every stored image of `entry` to its path under `new`,
    /// rewriting the references in place. On failure, assets already
    /// moved are put back before the error is returned.
    fn migrate_assets(&self, entry: &mut MuseEntry, new: ScheduleDate) -> Result<Vec<MovedAsset>> {
        let mut moved: Vec<MovedAsset> = Vec::new();

        for kind in AssetKind::ALL {
            let ImageRef::External(reference) = entry.image(kind) else {
                continue;
            };
            let Some(from) = self.assets.resolve_path(reference) else {
                continue;
            };

            // Legacy records can point both kinds at one file
            if let Some(done) = moved.iter().find(|m| m.from == from) {
                let reference = done.reference.clone();
                entry.set_image(kind, ImageRef::External(reference));
                continue;
            }

            let to = self.assets.path_for(new, kind);
            match self.assets.relocate(&from, &to) {
                Ok(reference) => {
                    entry.set_image(kind, ImageRef::External(reference.clone()));
                    moved.push(MovedAsset {
                        from,
                        to,
                        reference,
                    });
                }
                Err(e) => {
                    self.roll_back(&moved);
                    return Err(e);
                }
            }
        }

        Ok(moved)
    }

    fn roll_back(&self, moved: &[MovedAsset]) {
        for asset in moved.iter().rev() {
            if asset.from == asset.to {
                continue;
            }
            let restored = self
                .assets
                .relocate(&asset.to, &asset.from)
                .and_then(|_| self.assets.delete(&asset.to));
            if let Err(e) = restored {
                tracing::warn!(
                    "could not move asset '{}' back to '{}': {}",
                    asset.to,
                    asset.from,
                    e
                );
            }
        }
    }

    fn delete_best_effort(&self, path: &str, warnings: &mut Vec<CleanupWarning>) {
        if let Err(e) = self.assets.delete(path) {
            tracing::warn!("could not delete asset '{}': {}", path, e);
            warnings.push(CleanupWarning {
                path: path.to_string(),
                reason: e.to_string(),
            });
        }
    }
}

fn validate_draft(draft: &EntryDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(MuseError::InvalidEntry("title is required".to_string()));
    }
    for kind in AssetKind::ALL {
        if draft.image(kind).is_empty() {
            return Err(MuseError::InvalidEntry(format!("{} image is required", kind)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{EntryIter, MemoryAssetStore, MemoryEntryStore, StoreCapabilities};

    const TITLE_PNG: &[u8] = b"\x89PNG\r\n\x1a\ntitle-card";
    const COMIC_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfour-panels";

    fn fixed_clock() -> i64 {
        1_717_200_000_000
    }

    fn date(s: &str) -> ScheduleDate {
        ScheduleDate::parse(s).unwrap()
    }

    fn draft(d: &str, title: &str) -> EntryDraft {
        EntryDraft {
            scheduled_date: date(d),
            title: title.to_string(),
            episode_number: "#01".to_string(),
            title_image: ImageRef::from_raw(asset_codec::encode(TITLE_PNG, "image/png")),
            comic_image: ImageRef::from_raw(asset_codec::encode(COMIC_PNG, "image/png")),
            character_description: "a fox in a scarf".to_string(),
            concept: "The fox learns to bake.".to_string(),
        }
    }

    struct Fixture {
        entries: MemoryEntryStore,
        assets: MemoryAssetStore,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                entries: MemoryEntryStore::new(),
                assets: MemoryAssetStore::new(),
            }
        }

        fn service(&self) -> SchedulingService<'_> {
            SchedulingService::new(&self.entries, &self.assets).with_clock(fixed_clock)
        }
    }

    #[test]
    fn test_publish_externalizes_inline_images() {
        let fx = Fixture::new();
        let outcome = fx.service().publish(draft("2024-06-01", "Pilot")).unwrap();

        assert!(outcome.is_clean());
        let entry = outcome.value;
        assert_eq!(entry.created_at, 1_717_200_000_000);
        assert_eq!(entry.title_image.as_str(), "memory://muses/2024-06-01/title");
        assert_eq!(entry.comic_image.as_str(), "memory://muses/2024-06-01/comic");
        assert_eq!(fx.assets.get("muses/2024-06-01/title").unwrap().unwrap(), TITLE_PNG);
        assert_eq!(fx.assets.get("muses/2024-06-01/comic").unwrap().unwrap(), COMIC_PNG);

        let stored = fx.entries.get(date("2024-06-01")).unwrap().unwrap();
        assert_eq!(stored, entry);
    }

    #[test]
    fn test_publish_keeps_external_images_as_is() {
        let fx = Fixture::new();
        let mut d = draft("2024-06-01", "Pilot");
        d.title_image = ImageRef::from_raw("https://cdn.example/t.jpg");

        let entry = fx.service().publish(d).unwrap().value;

        assert_eq!(entry.title_image.as_str(), "https://cdn.example/t.jpg");
        assert_eq!(fx.assets.paths(), vec!["muses/2024-06-01/comic"]);
    }

    #[test]
    fn test_publish_conflict_leaves_existing_entry_unchanged() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "Pilot")).unwrap();
        let before = fx.entries.raw(date("2024-06-01")).unwrap();

        let err = service.publish(draft("2024-06-01", "Second")).unwrap_err();

        assert!(matches!(err, MuseError::DateConflict(d) if d == date("2024-06-01")));
        assert_eq!(fx.entries.raw(date("2024-06-01")).unwrap(), before);
        let kept = fx.entries.get(date("2024-06-01")).unwrap().unwrap();
        assert_eq!(kept.title, "Pilot");
    }

    #[test]
    fn test_publish_malformed_image_writes_nothing() {
        let fx = Fixture::new();
        let mut d = draft("2024-06-01", "Pilot");
        d.comic_image = ImageRef::Inline("data:image/png;base64,@@@".to_string());

        let err = fx.service().publish(d).unwrap_err();

        assert!(matches!(err, MuseError::MalformedAsset(_)));
        assert!(fx.assets.paths().is_empty());
        assert!(fx.entries.is_empty());
    }

    #[test]
    fn test_publish_requires_title_and_images() {
        let fx = Fixture::new();
        let mut d = draft("2024-06-01", "  ");
        assert!(matches!(
            fx.service().publish(d.clone()).unwrap_err(),
            MuseError::InvalidEntry(_)
        ));

        d.title = "Pilot".to_string();
        d.comic_image = ImageRef::External(String::new());
        assert!(matches!(
            fx.service().publish(d).unwrap_err(),
            MuseError::InvalidEntry(_)
        ));
    }

    #[test]
    fn test_publish_record_failure_leaves_orphan_then_retry_overwrites() {
        let fx = Fixture::new();
        fx.entries.set_fail_puts(true);

        let err = fx.service().publish(draft("2024-06-01", "Pilot")).unwrap_err();
        assert!(matches!(err, MuseError::StoreUnavailable { .. }));
        assert!(fx.entries.is_empty());
        assert_eq!(fx.assets.paths().len(), 2);

        fx.entries.set_fail_puts(false);
        fx.service().publish(draft("2024-06-01", "Pilot")).unwrap();
        assert_eq!(fx.assets.paths().len(), 2);
        assert_eq!(fx.entries.len(), 1);
    }

    #[test]
    fn test_publish_without_conditional_writes() {
        let fx = Fixture::new();
        let service = fx.service().without_conditional_writes();
        assert!(!service.uses_conditional_create());

        service.publish(draft("2024-06-01", "Pilot")).unwrap();
        assert!(matches!(
            service.publish(draft("2024-06-01", "Again")).unwrap_err(),
            MuseError::DateConflict(_)
        ));
    }

    /// Entry store where another writer claims `contested` between the
    /// advisory lookup and the conditional write
    struct RacingEntryStore {
        inner: MemoryEntryStore,
        contested: ScheduleDate,
    }

    impl EntryStore for RacingEntryStore {
        fn backend(&self) -> &'static str {
            "racing"
        }

        fn get(&self, date: ScheduleDate) -> Result<Option<MuseEntry>> {
            if date == self.contested {
                return Ok(None);
            }
            self.inner.get(date)
        }

        fn put(&self, entry: &MuseEntry) -> Result<()> {
            self.inner.put(entry)
        }

        fn delete(&self, date: ScheduleDate) -> Result<()> {
            self.inner.delete(date)
        }

        fn list_all(&self) -> Result<EntryIter<'_>> {
            self.inner.list_all()
        }

        fn capabilities(&self) -> StoreCapabilities {
            StoreCapabilities {
                conditional_create: true,
            }
        }

        fn put_if_absent(&self, entry: &MuseEntry) -> Result<bool> {
            if entry.scheduled_date == self.contested {
                return Ok(false);
            }
            self.inner.put_if_absent(entry)
        }
    }

    #[test]
    fn test_publish_losing_conditional_write_is_conflict() {
        let entries = RacingEntryStore {
            inner: MemoryEntryStore::new(),
            contested: date("2024-06-01"),
        };
        let assets = MemoryAssetStore::new();
        let service = SchedulingService::new(&entries, &assets).with_clock(fixed_clock);
        assert!(service.uses_conditional_create());

        let err = service.publish(draft("2024-06-01", "Pilot")).unwrap_err();

        assert!(matches!(err, MuseError::DateConflict(d) if d == date("2024-06-01")));
        assert!(entries.inner.is_empty());
    }

    #[test]
    fn test_reschedule_losing_conditional_write_restores_assets() {
        let entries = RacingEntryStore {
            inner: MemoryEntryStore::new(),
            contested: date("2024-06-05"),
        };
        let assets = MemoryAssetStore::new();
        let service = SchedulingService::new(&entries, &assets).with_clock(fixed_clock);
        service.publish(draft("2024-06-01", "Pilot")).unwrap();

        let err = service
            .reschedule(date("2024-06-01"), date("2024-06-05"))
            .unwrap_err();

        assert!(matches!(err, MuseError::DateConflict(d) if d == date("2024-06-05")));
        assert_eq!(
            assets.paths(),
            vec!["muses/2024-06-01/comic", "muses/2024-06-01/title"]
        );
        let kept = entries.get(date("2024-06-01")).unwrap().unwrap();
        assert_eq!(kept.title_image.as_str(), "memory://muses/2024-06-01/title");
        assert_eq!(assets.get("muses/2024-06-01/title").unwrap().unwrap(), TITLE_PNG);
    }

    #[test]
    fn test_reschedule_moves_entry_and_assets() {
        let fx = Fixture::new();
        let service = fx.service();
        let original = service.publish(draft("2024-06-01", "Pilot")).unwrap().value;

        let outcome = service.reschedule(date("2024-06-01"), date("2024-06-09")).unwrap();
        assert!(outcome.is_clean());

        assert!(fx.entries.get(date("2024-06-01")).unwrap().is_none());
        let moved = fx.entries.get(date("2024-06-09")).unwrap().unwrap();
        assert_eq!(moved.scheduled_date, date("2024-06-09"));
        assert_eq!(moved.title, original.title);
        assert_eq!(moved.created_at, original.created_at);
        assert_eq!(moved.title_image.as_str(), "memory://muses/2024-06-09/title");
        assert_eq!(
            fx.assets.paths(),
            vec!["muses/2024-06-09/comic", "muses/2024-06-09/title"]
        );
        assert_eq!(fx.assets.get("muses/2024-06-09/comic").unwrap().unwrap(), COMIC_PNG);
    }

    #[test]
    fn test_reschedule_same_date_is_noop() {
        let fx = Fixture::new();
        // No entry needed: same-date reschedule never touches the store
        fx.service()
            .reschedule(date("2024-06-01"), date("2024-06-01"))
            .unwrap();
        assert!(fx.entries.is_empty());
    }

    #[test]
    fn test_reschedule_missing_entry() {
        let fx = Fixture::new();
        let err = fx
            .service()
            .reschedule(date("2024-06-01"), date("2024-06-02"))
            .unwrap_err();
        assert!(matches!(err, MuseError::EntryNotFound(d) if d == date("2024-06-01")));
    }

    #[test]
    fn test_reschedule_conflict_changes_nothing() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();
        service.publish(draft("2024-06-02", "B")).unwrap();
        let raw_a = fx.entries.raw(date("2024-06-01")).unwrap();
        let raw_b = fx.entries.raw(date("2024-06-02")).unwrap();
        let assets_before = fx.assets.paths();

        let err = service
            .reschedule(date("2024-06-01"), date("2024-06-02"))
            .unwrap_err();

        assert!(matches!(err, MuseError::DateConflict(_)));
        assert_eq!(fx.entries.raw(date("2024-06-01")).unwrap(), raw_a);
        assert_eq!(fx.entries.raw(date("2024-06-02")).unwrap(), raw_b);
        assert_eq!(fx.assets.paths(), assets_before);
    }

    #[test]
    fn test_reschedule_record_failure_rolls_assets_back() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();
        fx.entries.set_fail_puts(true);

        let err = service
            .reschedule(date("2024-06-01"), date("2024-06-05"))
            .unwrap_err();

        assert!(matches!(err, MuseError::StoreUnavailable { .. }));
        assert!(fx.entries.get(date("2024-06-01")).unwrap().is_some());
        assert_eq!(
            fx.assets.paths(),
            vec!["muses/2024-06-01/comic", "muses/2024-06-01/title"]
        );
    }

    #[test]
    fn test_reschedule_old_record_delete_failure_keeps_both() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();
        fx.entries.set_fail_deletes(true);

        let err = service
            .reschedule(date("2024-06-01"), date("2024-06-05"))
            .unwrap_err();

        assert!(matches!(err, MuseError::StoreUnavailable { .. }));
        // Duplicated rather than lost
        assert!(fx.entries.get(date("2024-06-01")).unwrap().is_some());
        assert!(fx.entries.get(date("2024-06-05")).unwrap().is_some());
    }

    #[test]
    fn test_reschedule_cleanup_failure_is_a_warning() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();
        fx.assets.set_fail_deletes(true);

        let outcome = service
            .reschedule(date("2024-06-01"), date("2024-06-05"))
            .unwrap();

        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.path == "muses/2024-06-01/title"));
        assert!(fx.entries.get(date("2024-06-05")).unwrap().is_some());
        assert!(fx.entries.get(date("2024-06-01")).unwrap().is_none());
    }

    #[test]
    fn test_reschedule_leaves_foreign_and_inline_images_alone() {
        let fx = Fixture::new();
        let entry = MuseEntry {
            scheduled_date: date("2023-01-01"),
            created_at: 5,
            title: "Legacy".to_string(),
            episode_number: String::new(),
            title_image: ImageRef::from_raw("https://cdn.example/t.jpg"),
            comic_image: ImageRef::from_raw(asset_codec::encode(COMIC_PNG, "image/png")),
            character_description: String::new(),
            concept: String::new(),
        };
        fx.entries.put(&entry).unwrap();

        fx.service()
            .reschedule(date("2023-01-01"), date("2023-01-02"))
            .unwrap();

        let moved = fx.entries.get(date("2023-01-02")).unwrap().unwrap();
        assert_eq!(moved.title_image, entry.title_image);
        assert_eq!(moved.comic_image, entry.comic_image);
        assert!(fx.assets.paths().is_empty());
    }

    #[test]
    fn test_reschedule_shared_legacy_image_moves_once() {
        let fx = Fixture::new();
        fx.assets.put("legacy/old.jpg", b"art").unwrap();
        fx.entries
            .insert_raw(
                date("2023-01-01"),
                r#"{"scheduledDate": "2023-01-01", "imageUrl": "memory://legacy/old.jpg"}"#,
            )
            .unwrap();

        fx.service()
            .reschedule(date("2023-01-01"), date("2023-02-01"))
            .unwrap();

        let moved = fx.entries.get(date("2023-02-01")).unwrap().unwrap();
        assert_eq!(moved.title_image.as_str(), "memory://muses/2023-02-01/title");
        assert_eq!(moved.comic_image, moved.title_image);
        assert_eq!(fx.assets.paths(), vec!["muses/2023-02-01/title"]);
    }

    #[test]
    fn test_remove_deletes_entry_and_assets() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();

        let outcome = service.remove(date("2024-06-01")).unwrap();

        assert!(outcome.value);
        assert!(outcome.is_clean());
        assert!(fx.entries.is_empty());
        assert!(fx.assets.paths().is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let fx = Fixture::new();
        let service = fx.service();
        assert!(!service.remove(date("2024-06-01")).unwrap().value);
        service.publish(draft("2024-06-01", "A")).unwrap();
        assert!(service.remove(date("2024-06-01")).unwrap().value);
        assert!(!service.remove(date("2024-06-01")).unwrap().value);
    }

    #[test]
    fn test_remove_sweeps_orphans_from_failed_publish() {
        let fx = Fixture::new();
        fx.assets.put("muses/2024-06-01/comic", b"orphan").unwrap();
        let entry = MuseEntry {
            scheduled_date: date("2024-06-01"),
            created_at: 5,
            title: "Inline".to_string(),
            episode_number: String::new(),
            title_image: ImageRef::from_raw(asset_codec::encode(TITLE_PNG, "image/png")),
            comic_image: ImageRef::from_raw(asset_codec::encode(COMIC_PNG, "image/png")),
            character_description: String::new(),
            concept: String::new(),
        };
        fx.entries.put(&entry).unwrap();

        fx.service().remove(date("2024-06-01")).unwrap();

        assert!(fx.assets.paths().is_empty());
    }

    #[test]
    fn test_remove_asset_failure_still_removes_entry() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();
        fx.assets.set_fail_deletes(true);

        let outcome = service.remove(date("2024-06-01")).unwrap();

        assert!(outcome.value);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(fx.entries.is_empty());
    }

    #[test]
    fn test_remove_unreadable_record() {
        let fx = Fixture::new();
        fx.entries
            .insert_raw(date("2024-06-01"), "{broken")
            .unwrap();

        assert!(fx.service().remove(date("2024-06-01")).unwrap().value);
        assert!(fx.entries.is_empty());
    }

    #[test]
    fn test_at_most_one_entry_per_date_across_operations() {
        let fx = Fixture::new();
        let service = fx.service();
        service.publish(draft("2024-06-01", "A")).unwrap();
        service.publish(draft("2024-06-02", "B")).unwrap();
        let _ = service.publish(draft("2024-06-01", "C"));
        let _ = service.reschedule(date("2024-06-02"), date("2024-06-01"));
        service.reschedule(date("2024-06-02"), date("2024-06-03")).unwrap();
        service.publish(draft("2024-06-02", "D")).unwrap();
        service.remove(date("2024-06-03")).unwrap();

        let dates: Vec<ScheduleDate> = fx
            .entries
            .list_all()
            .unwrap()
            .map(|e| e.unwrap().scheduled_date)
            .collect();
        let mut unique = dates.clone();
        unique.dedup();
        assert_eq!(dates, unique);
        assert_eq!(dates, vec![date("2024-06-02"), date("2024-06-01")]);
        assert_eq!(
            fx.entries.get(date("2024-06-01")).unwrap().unwrap().title,
            "A"
        );
    }
}
