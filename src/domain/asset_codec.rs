//! Inline image references (`data:` URLs) to and from raw bytes

use crate::error::{MuseError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_MIME: &str = "image/png";

fn data_url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?s)^data:(image/[A-Za-z0-9.+-]+);base64,(.*)$").unwrap())
}

/// Bytes recovered from an inline reference, with the type tag it carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAsset {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Wrap raw bytes as a self-describing inline reference.
/// An empty mime hint falls back to `image/png`.
pub fn encode(bytes: &[u8], mime_hint: &str) -> String {
    let mime = if mime_hint.trim().is_empty() {
        DEFAULT_MIME
    } else {
        mime_hint.trim()
    };
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Decode an inline reference to its bytes
pub fn decode(inline_ref: &str) -> Result<Vec<u8>> {
    parse(inline_ref).map(|asset| asset.bytes)
}

/// Decode an inline reference, keeping its mime type
pub fn parse(inline_ref: &str) -> Result<DecodedAsset> {
    let captures = data_url_regex().captures(inline_ref).ok_or_else(|| {
        MuseError::MalformedAsset(format!(
            "missing data:image/*;base64 prefix in '{}'",
            preview(inline_ref)
        ))
    })?;

    let mime = captures[1].to_ascii_lowercase();
    let payload: String = captures[2]
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = BASE64
        .decode(payload.as_bytes())
        .map_err(|e| MuseError::MalformedAsset(format!("invalid base64 payload: {}", e)))?;

    Ok(DecodedAsset { mime, bytes })
}

/// True when the reference carries its bytes inline rather than pointing elsewhere
pub fn is_inline(reference: &str) -> bool {
    reference.trim_start().starts_with("data:")
}

/// Detect an image type from its magic number
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn preview(s: &str) -> String {
    s.chars().take(32).collect()
}
