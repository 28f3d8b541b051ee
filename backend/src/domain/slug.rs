//! URL slugs for article pages.
//!
//! A slug is the folded title followed by `_<id>`. The id suffix makes slugs
//! unique and lets page handlers recover the article without a slug index.

use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks removed after NFD decomposition.
const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036f}';

const ID_SEPARATOR: char = '_';

/// Build a slug from `title`, appending `_<id>` when `id` is non-empty.
///
/// Folding decomposes to NFD, drops combining marks, lowercases, trims, keeps
/// only ASCII digits, lowercase letters and spaces, then collapses each run of
/// spaces into a single `-`.
///
/// ```
/// use folio::domain::slugify;
///
/// assert_eq!(slugify("Héllo Wörld!", Some("ck1")), "hello-world_ck1");
/// assert_eq!(slugify("  Rust  in   Action ", None), "rust-in-action");
/// ```
#[must_use]
pub fn slugify(title: &str, id: Option<&str>) -> String {
    let folded: String = title
        .nfd()
        .filter(|ch| !COMBINING_MARKS.contains(ch))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut in_gap = false;
    for ch in folded.trim().chars() {
        if ch == ' ' {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            in_gap = false;
        }
    }

    if let Some(id) = id.filter(|id| !id.is_empty()) {
        slug.push(ID_SEPARATOR);
        slug.push_str(id);
    }
    slug
}

/// Recover the id suffix from a slug produced by [`slugify`].
///
/// Returns `None` when there is no `_` or nothing follows the last one.
#[must_use]
pub fn extract_id_from_slug(slug: &str) -> Option<&str> {
    slug.rsplit_once(ID_SEPARATOR)
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
}

/// Return `true` when `value` looks like an article slug with an id suffix.
#[must_use]
pub fn is_valid_article_slug(value: &str) -> bool {
    let allowed = value.chars().all(|ch| {
        ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == ID_SEPARATOR
    });
    allowed && extract_id_from_slug(value).is_some()
}
