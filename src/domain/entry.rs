//! The scheduled comic entry and its image references

use crate::domain::asset_codec;
use crate::domain::legacy::StoredRecord;
use crate::domain::ScheduleDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which of an entry's two images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Title,
    Comic,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Title, AssetKind::Comic];

    /// Stable name used in asset paths
    pub fn slug(&self) -> &'static str {
        match self {
            AssetKind::Title => "title",
            AssetKind::Comic => "comic",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// An image either embedded in the record or stored elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageRef {
    /// `data:<mime>;base64,...`
    Inline(String),
    /// URL or path resolvable by readers
    External(String),
}

impl ImageRef {
    /// Classify a raw reference string
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if asset_codec::is_inline(&raw) {
            ImageRef::Inline(raw)
        } else {
            ImageRef::External(raw)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Inline(s) | ImageRef::External(s) => s,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageRef::Inline(_))
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ImageRef::from_raw)
    }
}

/// One scheduled comic publication.
///
/// Records are always written in this shape. Reads go through
/// [`StoredRecord`], which also accepts older record layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredRecord")]
pub struct MuseEntry {
    pub scheduled_date: ScheduleDate,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub title: String,
    pub episode_number: String,
    pub title_image: ImageRef,
    pub comic_image: ImageRef,
    pub character_description: String,
    pub concept: String,
}

impl MuseEntry {
    pub fn image(&self, kind: AssetKind) -> &ImageRef {
        match kind {
            AssetKind::Title => &self.title_image,
            AssetKind::Comic => &self.comic_image,
        }
    }

    pub fn set_image(&mut self, kind: AssetKind, image: ImageRef) {
        match kind {
            AssetKind::Title => self.title_image = image,
            AssetKind::Comic => self.comic_image = image,
        }
    }

    /// Both images present
    pub fn is_published(&self) -> bool {
        !self.title_image.is_empty() && !self.comic_image.is_empty()
    }
}

/// Input to a publish: everything but the creation timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub scheduled_date: ScheduleDate,
    pub title: String,
    pub episode_number: String,
    pub title_image: ImageRef,
    pub comic_image: ImageRef,
    pub character_description: String,
    pub concept: String,
}

impl EntryDraft {
    pub fn image(&self, kind: AssetKind) -> &ImageRef {
        match kind {
            AssetKind::Title => &self.title_image,
            AssetKind::Comic => &self.comic_image,
        }
    }

    /// Turn the draft into an entry stamped with `created_at`
    pub fn into_entry(self, created_at: i64) -> MuseEntry {
        MuseEntry {
            scheduled_date: self.scheduled_date,
            created_at,
            title: self.title,
            episode_number: self.episode_number,
            title_image: self.title_image,
            comic_image: self.comic_image,
            character_description: self.character_description,
            concept: self.concept,
        }
    }
}
