//! Domain layer - Entry model, image references and date handling

pub mod asset_codec;
pub mod date;
pub mod entry;
pub mod generation;
pub mod legacy;
pub mod time_ref;

pub use asset_codec::DecodedAsset;
pub use date::ScheduleDate;
pub use entry::{AssetKind, EntryDraft, ImageRef, MuseEntry};
pub use generation::{GeneratedImage, GenerationCategory, GenerationError, ImageGenerator};
pub use time_ref::TimeReference;
