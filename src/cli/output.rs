//! Output formatting utilities

use crate::application::CleanupWarning;
use crate::domain::{AssetKind, MuseEntry};

/// One line per entry: date, episode and title
pub fn format_entry_list(entries: &[MuseEntry]) -> String {
    if entries.is_empty() {
        return "No entries found".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        let episode = if entry.episode_number.is_empty() {
            "-"
        } else {
            entry.episode_number.as_str()
        };
        output.push_str(&format!(
            "{}  {:<6} {}\n",
            entry.scheduled_date, episode, entry.title
        ));
    }
    output
}

/// Full view of one entry. Inline images are summarized, not dumped.
pub fn format_entry(entry: &MuseEntry) -> String {
    let mut output = format!("{}  {}\n", entry.scheduled_date, entry.title);
    if !entry.episode_number.is_empty() {
        output.push_str(&format!("episode:   {}\n", entry.episode_number));
    }
    for kind in AssetKind::ALL {
        let image = entry.image(kind);
        let shown = if image.is_inline() {
            format!("(inline, {} chars)", image.as_str().len())
        } else {
            image.as_str().to_string()
        };
        output.push_str(&format!("{:<10} {}\n", format!("{}:", kind), shown));
    }
    if !entry.character_description.is_empty() {
        output.push_str(&format!("character: {}\n", entry.character_description));
    }
    if !entry.concept.is_empty() {
        output.push_str(&format!("\n{}\n", entry.concept));
    }
    output
}

pub fn format_warnings(warnings: &[CleanupWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("warning: {}\n", w))
        .collect()
}
