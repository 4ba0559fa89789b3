use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{
    descendant_elements, element_text, first_image_in, has_class_matching, non_empty,
    parse_level, parse_number, race_from_types, ExtractStrategy, PartialCard,
};
use crate::domain::CardCategory;

static PANEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("aside.portable-infobox, div.portable-infobox").expect("valid panel selector")
});
static PI_DATA_VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".pi-data-value").expect("valid value selector"));
static PI_DATA_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)pi-data-value|pi-data").expect("valid pi-data regex"));

/// Portable info panel, fields keyed by `data-source`.
pub struct InfoboxStrategy;

impl ExtractStrategy for InfoboxStrategy {
    fn name(&self) -> &'static str {
        "infobox"
    }

    fn extract(&self, document: &Html) -> PartialCard {
        let Some(panel) = document.select(&PANEL).next() else {
            return PartialCard::default();
        };
        let lookup = |keys: &[&str]| keys.iter().find_map(|key| panel_value(panel, key));

        let type_text = lookup(&["type"]);
        PartialCard {
            attack: lookup(&["atk", "attack"]).and_then(|t| parse_number(&t)),
            defense: lookup(&["def", "defense"]).and_then(|t| parse_number(&t)),
            level: lookup(&["level", "stars"]).and_then(|t| parse_level(&t)),
            category: type_text.as_deref().and_then(CardCategory::from_raw),
            attribute: lookup(&["attribute"]),
            race: lookup(&["property", "species"])
                .or_else(|| type_text.as_deref().and_then(race_from_types)),
            description: lookup(&["lore", "description", "effect", "text"]),
            image: first_image_in(panel),
        }
    }
}

/// Value of the panel item whose `data-source` is `key`.
///
/// Looks for, in order: a `.pi-data-value` inside the item, any `pi-data*`
/// element inside it, a `.pi-data-value` in a following sibling, and finally
/// the first classed non-label child with text other than the key itself.
fn panel_value(panel: ElementRef, key: &str) -> Option<String> {
    let source = descendant_elements(panel).find(|e| e.value().attr("data-source") == Some(key))?;

    let value = source
        .select(&PI_DATA_VALUE)
        .next()
        .or_else(|| {
            descendant_elements(source)
                .find(|e| has_class_matching(e, &PI_DATA_CLASS) && !is_label(e))
        })
        .or_else(|| {
            source
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find_map(|sibling| sibling.select(&PI_DATA_VALUE).next())
        });

    match value {
        Some(element) => non_empty(element_text(element)),
        None => descendant_elements(source)
            .filter(|e| e.value().classes().next().is_some() && !is_label(e))
            .map(element_text)
            .find(|text| !text.is_empty() && text != key),
    }
}

fn is_label(element: &ElementRef) -> bool {
    element.value().classes().any(|c| c == "pi-data-label")
}
