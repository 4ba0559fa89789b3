use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::card_table::find_table;
use super::{
    element_text, has_class_matching, image_src, non_empty, parse_number, sane_level,
    ExtractStrategy, PartialCard,
};
use crate::domain::CardCategory;

const MAX_LABEL_CHARS: usize = 20;

static PANEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".portable-infobox").expect("valid panel selector"));
static LABEL_CANDIDATES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, div").expect("valid candidate selector"));
static DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div").expect("valid div selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid img selector"));
static LINKED_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.image img").expect("valid linked img selector"));
static LORE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)lore|description|card.*text").expect("valid lore regex"));
static IMAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)card.*image").expect("valid image regex"));

/// Loose label scan for pages that fit neither known layout.
pub struct GenericStrategy;

impl ExtractStrategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, document: &Html) -> PartialCard {
        let mut found = PartialCard {
            description: document
                .select(&DIV)
                .filter(|div| has_class_matching(div, &LORE_CLASS))
                .map(element_text)
                .find(|text| !text.is_empty()),
            image: document
                .select(&IMG)
                .filter(|img| has_class_matching(img, &IMAGE_CLASS))
                .chain(document.select(&LINKED_IMG))
                .find_map(image_src),
            ..PartialCard::default()
        };

        let Some(container) = find_table(document).or_else(|| document.select(&PANEL).next())
        else {
            return found;
        };

        found.attack = scan_values(container, &["atk", "attack"]).find_map(|v| parse_number(&v));
        found.defense = scan_values(container, &["def", "defense"]).find_map(|v| parse_number(&v));
        found.level = scan_values(container, &["level", "stars"]).find_map(|v| sane_level(&v));
        found.category = scan_values(container, &["type"]).find_map(|v| CardCategory::from_raw(&v));
        found.attribute = scan_values(container, &["attribute"]).next();
        found.race = scan_values(container, &["property", "species"]).next();
        found
    }
}

/// Values next to short cells mentioning any of `keys`.
///
/// The value is the next sibling element, or the parent when there is none.
fn scan_values<'a>(
    container: ElementRef<'a>,
    keys: &'a [&'a str],
) -> impl Iterator<Item = String> + 'a {
    container
        .select(&LABEL_CANDIDATES)
        .filter_map(move |cell| {
            let text = element_text(cell);
            let lower = text.to_lowercase();
            if text.chars().count() >= MAX_LABEL_CHARS || !keys.iter().any(|k| lower.contains(k)) {
                return None;
            }
            let value = cell
                .next_siblings()
                .find_map(ElementRef::wrap)
                .or_else(|| cell.parent().and_then(ElementRef::wrap))?;
            non_empty(element_text(value)).filter(|v| *v != text)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_scan_in_table() {
        let doc = Html::parse_document(
            r#"<table class="cardtable"><tr><td>Monster ATK</td><td>1800</td></tr>
<tr><td>Attribute</td><td>FIRE</td></tr></table>"#,
        );
        let found = GenericStrategy.extract(&doc);
        assert_eq!(found.attack, Some(1800));
        assert_eq!(found.attribute.as_deref(), Some("FIRE"));
    }

    #[test]
    fn test_level_noise_rejected() {
        let doc = Html::parse_document(
            r#"<table class="cardtable"><tr><td>Level</td><td>13</td></tr></table>"#,
        );
        assert_eq!(GenericStrategy.extract(&doc).level, None);
    }

    #[test]
    fn test_linked_image_fallback() {
        let doc = Html::parse_document(
            r#"<div><a class="image" href="/wiki/File:X"><img src="/img/x.png"></a></div>"#,
        );
        assert_eq!(GenericStrategy.extract(&doc).image.as_deref(), Some("/img/x.png"));
    }
}
