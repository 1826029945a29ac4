//! Identifier generation: storage filenames and catalog slugs.
//!
//! Two independent schemes. The storage filename is collision-resistant
//! within the uploads namespace (epoch-millis prefix plus sanitized stem).
//! The catalog slug is a deterministic, normalized candidate; catalog-level
//! uniqueness (suffixing on collision) is layered on top by the caller.

use deunicode::deunicode;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Marker inserted before the extension of thumbnail files.
pub const THUMBNAIL_SUFFIX: &str = "_thumb";

const MAX_BASENAME_LEN: usize = 40;
const MAX_SLUG_LEN: usize = 80;

/// Current time as milliseconds since the Unix epoch.
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Generate a storage filename for an upload: `<millis>-<sanitized-stem>.<ext>`.
///
/// The stem is lowercased, non-alphanumerics collapsed to hyphens, and
/// truncated to a bounded length. The timestamp prefix makes collisions
/// within the uploads namespace practically impossible.
pub fn storage_filename(original_name: &str, ext: &str) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    format!("{}-{}.{}", epoch_millis(), sanitize_stem(stem), ext)
}

/// Derive the thumbnail filename from a main filename by inserting the
/// thumbnail marker before the extension.
///
/// Deterministic, so deletion can re-derive it from the asset id alone.
pub fn thumbnail_filename(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{}{}.{}", stem, THUMBNAIL_SUFFIX, ext),
        None => format!("{}{}", filename, THUMBNAIL_SUFFIX),
    }
}

/// Lowercase a filename stem and collapse non-alphanumeric runs to hyphens,
/// bounded to 40 characters.
fn sanitize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_hyphen = false;
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen && !out.is_empty() {
            out.push('-');
            prev_hyphen = true;
        }
    }
    out.truncate(MAX_BASENAME_LEN);
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("upload");
    }
    out
}

/// Generate a URL-friendly slug from a title.
///
/// Transliterates to ASCII (diacritics stripped), lowercases, drops
/// everything outside `[a-z0-9\s-]`, collapses whitespace and hyphen runs
/// to single hyphens, and truncates to 80 characters. Deterministic and
/// idempotent for non-empty titles.
///
/// A missing or effectively-empty title falls back to `photo-<epoch-ms>`.
pub fn slugify(title: Option<&str>) -> String {
    if let Some(title) = title {
        let slug = slugify_text(title);
        if !slug.is_empty() {
            return slug;
        }
    }
    format!("photo-{}", epoch_millis())
}

fn slugify_text(title: &str) -> String {
    let ascii = deunicode(title).to_lowercase();
    let mut out = String::with_capacity(ascii.len());
    let mut prev_hyphen = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-') && !prev_hyphen && !out.is_empty() {
            out.push('-');
            prev_hyphen = true;
        }
        // Everything else is dropped without leaving a separator
    }
    out.truncate(MAX_SLUG_LEN);
    while out.ends_with('-') {
        out.pop();
    }
    out
}
