//! Tag field rules.

use thiserror::Error;

/// Maximum tag name length in characters.
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Maximum tag slug length in characters.
pub const MAX_TAG_SLUG_LEN: usize = 20;

/// Error returned when a string is not a 3- or 6-digit hex colour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex colour: {0:?}")]
pub struct InvalidColor(pub String);

/// Normalise a hex colour to `#RRGGBB`.
///
/// Strips a leading `#`, expands the 3-digit short form and uppercases.
pub fn normalize_color(raw: &str) -> Result<String, InvalidColor> {
    let digits = raw.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InvalidColor(raw.to_owned()));
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => return Err(InvalidColor(raw.to_owned())),
    };
    Ok(format!("#{}", expanded.to_ascii_uppercase()))
}

/// Slugs are 1–20 chars of ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_TAG_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
