//! Candidate wiki page identifiers for a card name.
//!
//! The wiki is inconsistent about how it turns names into page identifiers,
//! especially for numbered cards ("... #1") and names with commas or quotes.
//! Each entry of [`TRANSFORMS`] is one known identifier scheme; they are tried
//! in order and the first page that validates wins.

use once_cell::sync::Lazy;
use regex::Regex;

static UNDERSCORE_HASH_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_#(\d+)").expect("valid underscore-hash regex"));
static HASH_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\d+)").expect("valid hash-number regex"));
static UNDERSCORE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__+").expect("valid underscore-run regex"));

type Transform = fn(&str) -> String;

/// Identifier schemes, in the order they are tried.
pub const TRANSFORMS: [Transform; 6] = [
    spaces_then_number,
    number_then_spaces,
    spaces_only,
    no_punctuation,
    no_quotes,
    no_hash,
];

fn underscores(name: &str) -> String {
    name.replace(' ', "_")
}

fn collapse(s: &str) -> String {
    UNDERSCORE_RUN.replace_all(s, "_").into_owned()
}

/// `_#1` and `#1` both become `_1`.
fn number_suffix(s: &str) -> String {
    let s = UNDERSCORE_HASH_NUMBER.replace_all(s, "_${1}");
    HASH_NUMBER.replace_all(&s, "_${1}").into_owned()
}

fn strip_chars(s: &str, chars: &[char]) -> String {
    s.chars().filter(|c| !chars.contains(c)).collect()
}

fn spaces_then_number(name: &str) -> String {
    collapse(&number_suffix(&underscores(name)))
}

fn number_then_spaces(name: &str) -> String {
    let numbered = HASH_NUMBER.replace_all(name, "_${1}");
    collapse(&underscores(&numbered))
}

fn spaces_only(name: &str) -> String {
    underscores(name)
}

fn no_punctuation(name: &str) -> String {
    let stripped = strip_chars(&underscores(name), &[',', '\'', '"']);
    collapse(&number_suffix(&stripped))
}

fn no_quotes(name: &str) -> String {
    let stripped = strip_chars(&underscores(name), &['\'', '"']);
    collapse(&number_suffix(&stripped))
}

fn no_hash(name: &str) -> String {
    collapse(&strip_chars(&underscores(name), &['#']))
}

/// Ordered, duplicate-free candidate identifiers for `name`.
pub fn generate_patterns(name: &str) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::with_capacity(TRANSFORMS.len());
    for transform in TRANSFORMS {
        let pattern = transform(name);
        if pattern.is_empty() || patterns.contains(&pattern) {
            continue;
        }
        patterns.push(pattern);
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_name_with_comma() {
        let patterns = generate_patterns("Winged Dragon, Guardian of the Fortress #1");
        assert_eq!(
            patterns,
            vec![
                "Winged_Dragon,_Guardian_of_the_Fortress_1",
                "Winged_Dragon,_Guardian_of_the_Fortress_#1",
                "Winged_Dragon_Guardian_of_the_Fortress_1",
            ]
        );
    }

    #[test]
    fn test_plain_name_yields_single_pattern() {
        assert_eq!(generate_patterns("Dark Magician"), vec!["Dark_Magician"]);
        assert_eq!(
            generate_patterns("Blue-Eyes White Dragon"),
            vec!["Blue-Eyes_White_Dragon"]
        );
    }

    #[test]
    fn test_quoted_name_variants() {
        let patterns = generate_patterns("Nobleman of Crossout's Edge");
        assert_eq!(
            patterns,
            vec!["Nobleman_of_Crossout's_Edge", "Nobleman_of_Crossouts_Edge"]
        );
    }

    #[test]
    fn test_leading_number() {
        let patterns = generate_patterns("#1 Fan");
        assert_eq!(patterns, vec!["_1_Fan", "#1_Fan", "1_Fan"]);
    }

    #[test]
    fn test_numbered_names_non_empty_and_unique() {
        for name in [
            "Mystical Elf #2",
            "Ushi Oni #10",
            "Winged Dragon, Guardian of the Fortress #1",
            "\"Infernalqueen\" #3",
            "A#1",
        ] {
            let patterns = generate_patterns(name);
            assert!(!patterns.is_empty(), "no patterns for {name}");
            let mut deduped = patterns.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), patterns.len(), "duplicates for {name}");
        }
    }

    #[test]
    fn test_first_pattern_is_spaces_then_number() {
        let patterns = generate_patterns("Mystical Elf #2");
        assert_eq!(patterns[0], "Mystical_Elf_2");
        assert_eq!(patterns[1], "Mystical_Elf_#2");
    }

    #[test]
    fn test_empty_name_has_no_patterns() {
        assert!(generate_patterns("").is_empty());
    }
}
