//! Read side: what the public pages show.
//!
//! Nothing here writes. "Today" is always passed in so callers decide
//! which calendar they run on.

use crate::domain::{asset_codec, AssetKind, ImageRef, MuseEntry, ScheduleDate};
use crate::error::Result;
use crate::infrastructure::{AssetStore, EntryStore};

pub struct QueryFacade<'a> {
    entries: &'a dyn EntryStore,
    assets: &'a dyn AssetStore,
}

impl<'a> QueryFacade<'a> {
    pub fn new(entries: &'a dyn EntryStore, assets: &'a dyn AssetStore) -> Self {
        QueryFacade { entries, assets }
    }

    pub fn entry_for(&self, date: ScheduleDate) -> Result<Option<MuseEntry>> {
        self.entries.get(date)
    }

    /// Entries strictly before `date`, newest first
    pub fn entries_before(&self, date: ScheduleDate) -> Result<Vec<MuseEntry>> {
        self.entries.list_before(date)?.collect()
    }

    /// Every entry including future-scheduled ones, newest first
    pub fn all_entries(&self) -> Result<Vec<MuseEntry>> {
        self.entries.list_all()?.collect()
    }

    /// Like `all_entries`/`entries_before` but stops after `limit` entries
    /// without reading the rest
    pub fn recent(&self, before: Option<ScheduleDate>, limit: Option<usize>) -> Result<Vec<MuseEntry>> {
        let iter = match before {
            Some(date) => self.entries.list_before(date)?,
            None => self.entries.list_all()?,
        };
        match limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }

    /// The entry shown on the home page
    pub fn today(&self, today: ScheduleDate) -> Result<Option<MuseEntry>> {
        self.entry_for(today)
    }

    /// Past entries for the archive page
    pub fn archive(&self, today: ScheduleDate) -> Result<Vec<MuseEntry>> {
        self.entries_before(today)
    }

    /// Bytes behind an image reference. Inline images are decoded, stored
    /// ones are fetched; references this site does not own yield `None`.
    pub fn image_bytes(&self, image: &ImageRef) -> Result<Option<Vec<u8>>> {
        match image {
            ImageRef::Inline(raw) => asset_codec::decode(raw).map(Some),
            ImageRef::External(reference) => match self.assets.resolve_path(reference) {
                Some(path) => self.assets.get(&path),
                None => Ok(None),
            },
        }
    }

    /// What a renderer puts in an `src` attribute. Legacy single-image
    /// records already carry the shared image under both kinds.
    pub fn display_image<'e>(&self, entry: &'e MuseEntry, kind: AssetKind) -> &'e str {
        entry.image(kind).as_str()
    }
}
