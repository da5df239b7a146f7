//! Free-text relevance scoring and name collation.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::Park;

/// Score of a name equal to the query.
pub const EXACT_MATCH_SCORE: u8 = 100;
/// Score of a name starting with the query.
pub const PREFIX_MATCH_SCORE: u8 = 90;
/// Base score of a mid-name match. Each character before the match costs one
/// point, bottoming out at 1.
pub const SUBSTRING_MATCH_BASE: u8 = 80;

const MAX_POSITION_PENALTY: usize = 79;

/// A park matched by a free-text query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    /// Matched park.
    pub park: &'a Park,
    /// Localized name the query matched against.
    pub name: String,
    /// Relevance score in `1..=100`.
    pub score: u8,
}

/// Score how well `name` matches `query`, case-insensitively.
///
/// Returns `None` when the name does not contain the query or the query is
/// blank.
///
/// # Examples
/// ```
/// use skatepark_core::search::relevance_score;
///
/// assert_eq!(relevance_score("Central Park", "central park"), Some(100));
/// assert_eq!(relevance_score("Central Park Extra", "central"), Some(90));
/// assert_eq!(relevance_score("The Central", "central"), Some(76));
/// assert_eq!(relevance_score("Sportek", "central"), None);
/// ```
#[must_use]
pub fn relevance_score(name: &str, query: &str) -> Option<u8> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let haystack = name.to_lowercase();
    if haystack == needle {
        return Some(EXACT_MATCH_SCORE);
    }
    let byte_index = haystack.find(&needle)?;
    if byte_index == 0 {
        return Some(PREFIX_MATCH_SCORE);
    }
    let char_index = haystack
        .char_indices()
        .take_while(|(offset, _)| *offset < byte_index)
        .count();
    let penalty = u8::try_from(char_index.min(MAX_POSITION_PENALTY)).unwrap_or(u8::MAX);
    Some(SUBSTRING_MATCH_BASE.saturating_sub(penalty).max(1))
}

/// Order hits by descending score, then by localized name.
#[must_use]
pub fn compare_by_relevance(a: &SearchHit<'_>, b: &SearchHit<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| compare_localized_names(&a.name, &b.name))
}

/// Compare display names the way a reader of either language expects.
///
/// Names are compared on a collation key that drops diacritics (including
/// Hebrew vowel points) and case; raw code point order breaks remaining ties
/// so the ordering stays total.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use skatepark_core::search::compare_localized_names;
///
/// assert_eq!(compare_localized_names("árbol", "Azul"), Ordering::Less);
/// assert_eq!(compare_localized_names("beta", "Alpha"), Ordering::Greater);
/// ```
#[must_use]
pub fn compare_localized_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
