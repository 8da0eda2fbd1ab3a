//! Generate both images for a new entry and publish it.

use crate::application::scheduling::{Outcome, SchedulingService};
use crate::domain::generation::{comic_prompt, title_prompt};
use crate::domain::{
    asset_codec, AssetKind, EntryDraft, ImageGenerator, ImageRef, MuseEntry, ScheduleDate,
};
use crate::error::{MuseError, Result};

/// Creator input for one day's comic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    pub scheduled_date: ScheduleDate,
    pub title: String,
    pub episode_number: String,
    pub character_description: String,
    pub concept: String,
}

impl ComposeRequest {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.episode_number.trim().is_empty() {
            return Err(MuseError::InvalidEntry(
                "title and episode number are required to generate a title card".to_string(),
            ));
        }
        if self.concept.trim().is_empty() {
            return Err(MuseError::InvalidEntry(
                "a concept is required to generate a comic".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run both generations, then publish. A generation failure returns
/// before either store is touched.
pub fn compose_and_publish(
    generator: &dyn ImageGenerator,
    scheduler: &SchedulingService<'_>,
    request: ComposeRequest,
) -> Result<Outcome<MuseEntry>> {
    request.validate()?;

    let title = generator.generate(
        AssetKind::Title,
        &title_prompt(
            &request.title,
            &request.episode_number,
            &request.character_description,
        ),
    )?;
    tracing::debug!("title card generated ({} bytes)", title.bytes.len());

    let comic = generator.generate(
        AssetKind::Comic,
        &comic_prompt(&request.concept, &request.character_description),
    )?;
    tracing::debug!("comic generated ({} bytes)", comic.bytes.len());

    let draft = EntryDraft {
        scheduled_date: request.scheduled_date,
        title: request.title,
        episode_number: request.episode_number,
        title_image: ImageRef::Inline(asset_codec::encode(&title.bytes, &title.mime)),
        comic_image: ImageRef::Inline(asset_codec::encode(&comic.bytes, &comic.mime)),
        character_description: request.character_description,
        concept: request.concept,
    };
    scheduler.publish(draft)
}
