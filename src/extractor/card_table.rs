use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{
    element_text, first_image_in, has_class_matching, non_empty, parse_number, race_from_types,
    sane_level, ExtractStrategy, PartialCard,
};
use crate::domain::CardCategory;

/// Cells longer than this are content, not labels.
const MAX_LABEL_CHARS: usize = 30;

static CARDTABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.cardtable").expect("valid cardtable selector"));
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid table selector"));
static DIV_CARDTABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.cardtable").expect("valid div selector"));
static CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").expect("valid cell selector"));
static CARD_TABLE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)card.*table").expect("valid class regex"));

static ATK_LABEL: Lazy<Regex> = Lazy::new(|| label(r"ATK|Attack"));
static DEF_LABEL: Lazy<Regex> = Lazy::new(|| label(r"DEF|Defense"));
static LEVEL_LABEL: Lazy<Regex> = Lazy::new(|| label(r"Level|Stars"));
static TYPE_LABEL: Lazy<Regex> = Lazy::new(|| label(r"Type|Card Type"));
static ATTRIBUTE_LABEL: Lazy<Regex> = Lazy::new(|| label(r"Attribute"));
static RACE_LABEL: Lazy<Regex> = Lazy::new(|| label(r"Property|Species"));
static LORE_LABEL: Lazy<Regex> = Lazy::new(|| label(r"Lore|Description|Card Text|Effect"));

fn label(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("valid label regex")
}

/// The card's label/value table, if the page has one.
pub(super) fn find_table(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&CARDTABLE)
        .next()
        .or_else(|| {
            document
                .select(&TABLE)
                .find(|t| has_class_matching(t, &CARD_TABLE_CLASS))
        })
        .or_else(|| document.select(&DIV_CARDTABLE).next())
}

/// Older label/value card table.
pub struct CardTableStrategy;

impl ExtractStrategy for CardTableStrategy {
    fn name(&self) -> &'static str {
        "card-table"
    }

    fn extract(&self, document: &Html) -> PartialCard {
        let Some(table) = find_table(document) else {
            return PartialCard::default();
        };

        let type_values: Vec<String> = labelled_values(table, &TYPE_LABEL).collect();
        let race = labelled_values(table, &RACE_LABEL).next().or_else(|| {
            type_values
                .iter()
                .find_map(|value| race_from_types(value))
        });

        PartialCard {
            attack: numeric_values(table, &ATK_LABEL).find_map(|v| parse_number(&v)),
            defense: numeric_values(table, &DEF_LABEL).find_map(|v| parse_number(&v)),
            level: numeric_values(table, &LEVEL_LABEL).find_map(|v| sane_level(&v)),
            category: type_values
                .iter()
                .find_map(|value| CardCategory::from_raw(value)),
            attribute: labelled_values(table, &ATTRIBUTE_LABEL).next(),
            race,
            description: labelled_values(table, &LORE_LABEL).next(),
            image: first_image_in(table),
        }
    }
}

/// `(label, value)` for each label cell matching `pattern`, where the value
/// is the non-empty text of the next `td`.
fn labelled_cells<'a>(
    table: ElementRef<'a>,
    pattern: &'a Regex,
) -> impl Iterator<Item = (String, String)> + 'a {
    table.select(&CELLS).filter_map(move |cell| {
        let text = element_text(cell);
        if text.chars().count() > MAX_LABEL_CHARS || !pattern.is_match(&text) {
            return None;
        }
        let value = cell
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "td")?;
        Some((text, non_empty(element_text(value))?))
    })
}

fn labelled_values<'a>(
    table: ElementRef<'a>,
    pattern: &'a Regex,
) -> impl Iterator<Item = String> + 'a {
    labelled_cells(table, pattern).map(|(_, value)| value)
}

/// Like [`labelled_values`], skipping label cells marked with `?`.
fn numeric_values<'a>(
    table: ElementRef<'a>,
    pattern: &'a Regex,
) -> impl Iterator<Item = String> + 'a {
    labelled_cells(table, pattern)
        .filter(|(label, _)| !label.contains('?'))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &str) -> Html {
        Html::parse_document(&format!(
            "<html><body><table class='cardtable'><tbody>{rows}</tbody></table></body></html>"
        ))
    }

    #[test]
    fn test_question_mark_stats_skipped() {
        let doc = table("<tr><th>ATK</th><td>?</td></tr><tr><th>DEF</th><td>1000</td></tr>");
        let found = CardTableStrategy.extract(&doc);
        assert_eq!(found.attack, None);
        assert_eq!(found.defense, Some(1000));
    }

    #[test]
    fn test_question_mark_labels_skipped_values_parsed() {
        let doc = table(
            "<tr><th>ATK?</th><td>1000</td></tr><tr><th>ATK</th><td>2500?</td></tr><tr><th>DEF?</th><td>2100</td></tr>",
        );
        let found = CardTableStrategy.extract(&doc);
        assert_eq!(found.attack, Some(2500));
        assert_eq!(found.defense, None);
    }

    #[test]
    fn test_table_found_by_class_pattern() {
        let doc = Html::parse_document(
            "<table class='wikitable card-info-table'><tr><td>Attribute</td><td>EARTH</td></tr></table>",
        );
        assert_eq!(
            CardTableStrategy.extract(&doc).attribute.as_deref(),
            Some("EARTH")
        );
    }

    #[test]
    fn test_trap_category() {
        let doc = table("<tr><td>Card type</td><td>Trap Card</td></tr>");
        assert_eq!(CardTableStrategy.extract(&doc).category, Some(CardCategory::Trap));
    }

    #[test]
    fn test_species_label_preferred_for_race() {
        let doc = table(
            "<tr><td>Types</td><td>Fiend / Effect</td></tr><tr><td>Species</td><td>Zombie</td></tr>",
        );
        assert_eq!(CardTableStrategy.extract(&doc).race.as_deref(), Some("Zombie"));
    }
}
