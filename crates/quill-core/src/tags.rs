//! Tag input normalization and slug derivation.

use unicode_normalization::UnicodeNormalization;

use crate::domain::Tag;
use crate::error::RepoError;
use crate::ports::TagRepository;

/// Both separators are accepted in tag input; `,` is folded into this one.
pub const TAG_SEPARATOR: char = ';';

/// Split free-text tag input into distinct tag names.
///
/// Commas and semicolons are interchangeable, surrounding whitespace is
/// dropped and tokens without a slug (empty or punctuation only) are
/// discarded. Names keep their first occurrence order; repeats collapse.
pub fn parse_tag_input(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let folded = raw.trim().replace(',', ";");
    let mut names: Vec<String> = Vec::new();
    for token in folded.split(TAG_SEPARATOR).map(str::trim) {
        if slugify(token).is_empty() || names.iter().any(|n| n == token) {
            continue;
        }
        names.push(token.to_string());
    }
    names
}

/// Parse tag input and resolve every name to a stored tag, creating the
/// missing ones.
pub async fn resolve_tags(
    repo: &dyn TagRepository,
    raw: Option<&str>,
) -> Result<Vec<Tag>, RepoError> {
    let mut tags = Vec::new();
    for name in parse_tag_input(raw) {
        tags.push(repo.get_or_create(&name).await?);
    }
    Ok(tags)
}

/// Derive a URL-safe slug from a display name.
///
/// Unicode letters and digits survive (after NFKC normalization and
/// lowercasing), punctuation is removed and runs of whitespace or hyphens
/// become a single `-`. Leading and trailing `-`/`_` are stripped.
pub fn slugify(name: &str) -> String {
    let normalized: String = name.nfkc().collect::<String>().to_lowercase();

    let mut slug = String::with_capacity(normalized.len());
    let mut pending_dash = false;
    for ch in normalized.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        } else if ch.is_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}
