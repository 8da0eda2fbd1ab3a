//! Boundary to the image-generation provider.
//!
//! The provider itself lives outside this crate. What lives here is the
//! contract it must satisfy, the failure categories callers can act on,
//! and the prompt text sent with each request.

use crate::domain::AssetKind;
use std::fmt;
use thiserror::Error;

/// Provider failure classes surfaced to the creator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationCategory {
    Authorization,
    Quota,
    ContentSafety,
    Other,
}

impl fmt::Display for GenerationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationCategory::Authorization => "authorization",
            GenerationCategory::Quota => "quota",
            GenerationCategory::ContentSafety => "content safety",
            GenerationCategory::Other => "provider",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Image generation failed ({category}): {message}")]
pub struct GenerationError {
    pub category: GenerationCategory,
    pub message: String,
}

impl GenerationError {
    pub fn new(category: GenerationCategory, message: impl Into<String>) -> Self {
        GenerationError {
            category,
            message: message.into(),
        }
    }

    /// Categorize a raw provider message
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let category = if lower.contains("api key") {
            GenerationCategory::Authorization
        } else if lower.contains("quota") || lower.contains("limit") {
            GenerationCategory::Quota
        } else if lower.contains("safety") || lower.contains("blocked") {
            GenerationCategory::ContentSafety
        } else {
            GenerationCategory::Other
        };
        GenerationError { category, message }
    }
}

/// Raw image returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// An image-generation provider. Prompts are built by the caller with
/// [`title_prompt`] and [`comic_prompt`].
pub trait ImageGenerator {
    fn generate(&self, kind: AssetKind, prompt: &str) -> Result<GeneratedImage, GenerationError>;
}

/// Prompt for the title card
pub fn title_prompt(title: &str, episode_number: &str, character_description: &str) -> String {
    let mut prompt = format!(
        "Output a colored square concept image with the following text in the middle as a title: \"{}\".\n\
        -Surround the text with decorations so that it expresses the content in the title.\n\
        -Be sure to include the given number above the title: \"{}\"\n\
        -Create an image in a detailed anime aesthetic: smooth cel-shaded coloring, and clean linework or atmosphere typical of anime scenes.\n",
        title, episode_number
    );
    if !character_description.trim().is_empty() {
        prompt.push_str(&format!(
            "Feature this character in the illustration: {}\n",
            character_description.trim()
        ));
    }
    prompt
}

/// Prompt for the four-panel comic
pub fn comic_prompt(concept: &str, character_description: &str) -> String {
    let character = if character_description.trim().is_empty() {
        String::new()
    } else {
        format!(
            "• Main Character Appearance: {}. Ensure this character is the main figure.\n",
            character_description.trim()
        )
    };

    format!(
        "Create a colored 4-panel comic that visually explains the content below across four equally sized square panels.\n\
        Rules:\n\
        • Output a square image (aspect ratio 1:1) on a white background.\n\
        • Show the exact sentences of the content as speech bubbles or narration.\n\
        • One sentence per panel. Number each panel in its top left corner from 1 to 4.\n\
        • Scale text and illustrations to fit neatly within each panel.\n\
        Illustration guidelines:\n\
        • Use a detailed japanese anime aesthetic: expressive eyes, smooth cel-shaded coloring, clean linework.\n\
        {}\
        • Use various angles to describe the character.\n\
        Before finishing, check the image is square and free of spelling and grammar mistakes.\n\n\
        Content:\n\"{}\"",
        character,
        concept.trim()
    )
}
