//! Name normalization and page/name match validation.
//!
//! Wiki page titles are noisy (suffixes like "(Anime)", stray punctuation,
//! different capitalization), so names are compared in a normalized
//! lowercase form and, failing exact or substring matches, by the share of
//! significant words they have in common.

use std::collections::HashSet;

use crate::domain::MatchDecision;

/// Minimum share of the expected name's significant words that must appear
/// in the candidate title. Unverified tuning parameter kept for compatibility
/// with earlier scrape results.
pub const MATCH_THRESHOLD: f64 = 0.75;

const STOP_WORDS: [&str; 6] = ["the", "of", "a", "an", "and", "or"];

/// Lowercase, turn every non-alphanumeric, non-whitespace char into a space,
/// collapse whitespace and trim.
pub fn normalize(name: &str) -> String {
    let replaced: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Words of a normalized string that carry meaning for matching.
pub fn significant_words(normalized: &str) -> HashSet<&str> {
    normalized
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w) && w.chars().count() > 2)
        .collect()
}

/// Fraction of `expected`'s significant words also present in `other`.
///
/// Both arguments are normalized strings. Returns `None` when `expected`
/// has no significant words.
pub fn overlap_ratio(expected: &str, other: &str) -> Option<f64> {
    let expected_words = significant_words(expected);
    if expected_words.is_empty() {
        return None;
    }
    let other_words = significant_words(other);
    let shared = expected_words.intersection(&other_words).count();
    Some(shared as f64 / expected_words.len() as f64)
}

fn percent(ratio: f64) -> u32 {
    (ratio * 100.0) as u32
}

/// Decide whether a page titled `page_title` is the card `expected_name`.
pub fn validate(page_title: Option<&str>, expected_name: &str) -> MatchDecision {
    let Some(title) = page_title.map(str::trim) else {
        return MatchDecision::reject("No page title found");
    };

    let page = normalize(title);
    // A punctuation-only title normalizes to "", which every name contains;
    // treat it as no title rather than a partial match.
    if title.chars().count() < 2 || page.is_empty() {
        return MatchDecision::reject("Empty or invalid page title");
    }

    let expected = normalize(expected_name);

    if page == expected {
        return MatchDecision::accept("exact match");
    }

    if page.contains(&expected) || expected.contains(&page) {
        return MatchDecision::accept(format!("partial match (page: '{}')", title));
    }

    let Some(ratio) = overlap_ratio(&expected, &page) else {
        return MatchDecision::accept("no significant words");
    };

    if ratio >= MATCH_THRESHOLD {
        MatchDecision::accept(format!(
            "high word overlap ({}%, page: '{}')",
            percent(ratio),
            title
        ))
    } else {
        MatchDecision::reject(format!(
            "low word overlap ({}%, page: '{}' vs expected: '{}')",
            percent(ratio),
            title,
            expected_name
        ))
    }
}

/// Cheap check applied to search result titles before fetching them.
pub fn plausible_search_hit(result_title: &str, expected_name: &str) -> bool {
    let result = normalize(result_title);
    let expected = normalize(expected_name);
    if result == expected {
        return true;
    }
    match overlap_ratio(&expected, &result) {
        Some(ratio) => ratio >= MATCH_THRESHOLD,
        None => true,
    }
}
