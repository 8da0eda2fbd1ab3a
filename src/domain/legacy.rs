//! Tolerant reading of stored entry records.
//!
//! Older records carry a single flat `imageUrl`, or a `panels` array whose
//! first element holds the artwork, instead of the split
//! `titleImage`/`comicImage` pair. Some lack `createdAt`, and records
//! written by the document-store variant carry a redundant `id` equal to
//! the date. Everything is normalized here, so nothing past the store
//! layer ever sees a legacy shape.

use crate::domain::{ImageRef, MuseEntry, ScheduleDate};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
struct LegacyPanel {
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
}

/// Any record shape we know how to read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    #[serde(default)]
    scheduled_date: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    created_at: Option<f64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    episode_number: Option<String>,
    #[serde(default)]
    title_image: Option<String>,
    #[serde(default)]
    comic_image: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    panels: Option<Vec<LegacyPanel>>,
    #[serde(default)]
    character_description: Option<String>,
    #[serde(default)]
    concept: Option<String>,
}

/// Why a stored record could not be normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShapeError(pub String);

impl fmt::Display for RecordShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl TryFrom<StoredRecord> for MuseEntry {
    type Error = RecordShapeError;

    fn try_from(record: StoredRecord) -> Result<Self, Self::Error> {
        let raw_date = non_empty(record.scheduled_date)
            .or_else(|| non_empty(record.id))
            .ok_or_else(|| RecordShapeError("record has no scheduledDate".to_string()))?;
        let scheduled_date = ScheduleDate::parse(&raw_date)
            .map_err(|_| RecordShapeError(format!("bad scheduledDate '{}'", raw_date)))?;

        let first_panel = record
            .panels
            .and_then(|panels| panels.into_iter().next())
            .and_then(|panel| non_empty(panel.image_url));

        let comic = non_empty(record.comic_image)
            .or_else(|| non_empty(record.image_url))
            .or(first_panel);
        let title = non_empty(record.title_image).or_else(|| comic.clone());

        let (title_image, comic_image) = match (title, comic) {
            (Some(title), Some(comic)) => (title, comic),
            (Some(title), None) => (title.clone(), title),
            _ => {
                return Err(RecordShapeError(format!(
                    "record for {} has no image",
                    scheduled_date
                )))
            }
        };

        Ok(MuseEntry {
            scheduled_date,
            created_at: record.created_at.map(|ms| ms as i64).unwrap_or(0),
            title: record.title.unwrap_or_default(),
            episode_number: record.episode_number.unwrap_or_default(),
            title_image: ImageRef::from_raw(title_image),
            comic_image: ImageRef::from_raw(comic_image),
            character_description: record.character_description.unwrap_or_default(),
            concept: record.concept.unwrap_or_default(),
        })
    }
}
