//! Structured card fields from a wiki page.
//!
//! Pages come in two layouts: a portable info panel keyed by `data-source`
//! attributes, and an older label/value card table. Each layout is handled by
//! an [`ExtractStrategy`]; a generic strategy picks up whatever the two miss.
//! Strategies run in order and their [`PartialCard`]s are merged
//! first-non-null-wins, so a field found by an earlier strategy is never
//! overwritten by a later one.

mod card_table;
mod generic;
mod infobox;

pub use card_table::CardTableStrategy;
pub use generic::GenericStrategy;
pub use infobox::InfoboxStrategy;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{CardCategory, CardRecord};

/// Levels outside `1..=MAX_LEVEL` read from loosely structured markup are
/// treated as extraction noise. Unverified tuning parameter.
pub const MAX_LEVEL: u32 = 12;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("valid number regex"));

static TITLE_SELECTORS: Lazy<[Selector; 3]> = Lazy::new(|| {
    ["h1.page-header__title", "h1#firstHeading", "h1"]
        .map(|s| Selector::parse(s).expect("valid title selector"))
});

static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid img selector"));

/// Fields a single strategy managed to read. `None` means "not found here".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCard {
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub level: Option<u32>,
    pub category: Option<CardCategory>,
    pub attribute: Option<String>,
    pub race: Option<String>,
    pub description: Option<String>,
    /// Raw `src`-like attribute value, possibly relative.
    pub image: Option<String>,
}

impl PartialCard {
    /// Fill every field still missing in `self` from `other`.
    pub fn merge_missing(&mut self, other: PartialCard) {
        self.attack = self.attack.or(other.attack);
        self.defense = self.defense.or(other.defense);
        self.level = self.level.or(other.level);
        self.category = self.category.or(other.category);
        self.attribute = self.attribute.take().or(other.attribute);
        self.race = self.race.take().or(other.race);
        self.description = self.description.take().or(other.description);
        self.image = self.image.take().or(other.image);
    }
}

pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, document: &Html) -> PartialCard;
}

pub struct FieldExtractor {
    site: Url,
    placeholder_image: String,
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl FieldExtractor {
    /// `site` resolves relative image links; `placeholder_image` may contain
    /// `{id}`, which is replaced by the card id.
    pub fn new(site: Url, placeholder_image: impl Into<String>) -> Self {
        Self {
            site,
            placeholder_image: placeholder_image.into(),
            strategies: vec![
                Box::new(InfoboxStrategy),
                Box::new(CardTableStrategy),
                Box::new(GenericStrategy),
            ],
        }
    }

    /// Best-effort record for card `id`. Never fails; unknown fields keep
    /// their defaults and `name` is always the given one.
    pub fn extract(&self, document: &Html, id: i64, name: &str) -> CardRecord {
        let mut merged = PartialCard::default();
        for strategy in &self.strategies {
            let found = strategy.extract(document);
            tracing::trace!(strategy = strategy.name(), ?found, "extraction pass");
            merged.merge_missing(found);
        }

        let image = merged
            .image
            .as_deref()
            .and_then(|src| self.absolutize(src))
            .unwrap_or_else(|| self.placeholder_for(id));

        let mut card = CardRecord::new(id, name, image);
        card.category = merged.category.unwrap_or_default();
        card.level = match card.category {
            CardCategory::Monster => merged.level.unwrap_or(0),
            CardCategory::Spell | CardCategory::Trap => 0,
        };
        card.attack = merged.attack.unwrap_or(0);
        card.defense = merged.defense.unwrap_or(0);
        card.attribute = merged.attribute;
        card.race = merged.race;
        card.description = merged.description;
        card.cost = CardRecord::derive_cost(card.category, card.level);
        card
    }

    pub fn placeholder_for(&self, id: i64) -> String {
        self.placeholder_image.replace("{id}", &id.to_string())
    }

    fn absolutize(&self, src: &str) -> Option<String> {
        if src.starts_with("http://") || src.starts_with("https://") {
            return Some(src.to_string());
        }
        self.site.join(src).ok().map(String::from)
    }
}

/// Title of the page as shown in its main heading.
pub fn page_title(document: &Html) -> Option<String> {
    TITLE_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    })
}

/// Text content with whitespace collapsed.
pub(crate) fn element_text(element: ElementRef) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First signed integer in `text`.
pub(crate) fn parse_number(text: &str) -> Option<i32> {
    NUMBER.find(text).and_then(|m| m.as_str().parse().ok())
}

pub(crate) fn parse_level(text: &str) -> Option<u32> {
    parse_number(text).and_then(|n| u32::try_from(n).ok())
}

/// Level if it looks like a real card level.
pub(crate) fn sane_level(text: &str) -> Option<u32> {
    parse_level(text).filter(|level| (1..=MAX_LEVEL).contains(level))
}

/// Race from an `X / Y` style type string, e.g. "Dragon / Effect".
pub(crate) fn race_from_types(text: &str) -> Option<String> {
    let (race, _) = text.split_once('/')?;
    let race = race.trim();
    (!race.is_empty()).then(|| race.to_string())
}

pub(crate) fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

pub(crate) fn descendant_elements<'a>(
    element: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}

pub(crate) fn has_class_matching(element: &ElementRef, pattern: &Regex) -> bool {
    element.value().classes().any(|class| pattern.is_match(class))
}

/// Usable image location of an `<img>`, skipping inline `data:` placeholders.
pub(crate) fn image_src(element: ElementRef) -> Option<String> {
    ["src", "data-src", "data-image"].iter().find_map(|attr| {
        element
            .value()
            .attr(attr)
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.starts_with("data:"))
            .map(String::from)
    })
}

pub(crate) fn first_image_in(element: ElementRef) -> Option<String> {
    element.select(&IMG).find_map(image_src)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(
            Url::parse("https://yugioh.fandom.com/wiki/").unwrap(),
            "https://images.ygoprodeck.com/images/cards/{id}.jpg",
        )
    }

    const INFOBOX_MONSTER: &str = r#"
<html><body>
<h1 class="page-header__title">Dark Magician</h1>
<aside class="portable-infobox">
  <figure><a class="image"><img src="//static.wikia.nocookie.net/yugioh/images/dm.png"></a></figure>
  <div class="pi-item pi-data" data-source="type">
    <h3 class="pi-data-label">Card type</h3>
    <div class="pi-data-value">Monster Card</div>
  </div>
  <div class="pi-item pi-data" data-source="attribute">
    <h3 class="pi-data-label">Attribute</h3>
    <div class="pi-data-value">DARK</div>
  </div>
  <div class="pi-item pi-data" data-source="species">
    <h3 class="pi-data-label">Types</h3>
    <div class="pi-data-value">Spellcaster</div>
  </div>
  <div class="pi-item pi-data" data-source="level">
    <h3 class="pi-data-label">Level</h3>
    <div class="pi-data-value">7</div>
  </div>
  <div class="pi-item pi-data" data-source="atk">
    <h3 class="pi-data-label">ATK</h3>
    <div class="pi-data-value">2500</div>
  </div>
  <div class="pi-item pi-data" data-source="def">
    <h3 class="pi-data-label">DEF</h3>
    <div class="pi-data-value">2100</div>
  </div>
  <div class="pi-item pi-data" data-source="lore">
    <h3 class="pi-data-label">Lore</h3>
    <div class="pi-data-value">The ultimate wizard in terms of attack and defense.</div>
  </div>
</aside>
</body></html>"#;

    fn card_table(rows: &str) -> String {
        format!(
            r#"<html><body><h1 id="firstHeading">Card</h1>
<table class="cardtable"><tbody>{rows}</tbody></table></body></html>"#
        )
    }

    #[test]
    fn test_infobox_monster() {
        let doc = Html::parse_document(INFOBOX_MONSTER);
        let card = extractor().extract(&doc, 2, "Dark Magician");

        assert_eq!(card.name, "Dark Magician");
        assert_eq!(card.category, CardCategory::Monster);
        assert_eq!(card.level, 7);
        assert_eq!(card.attack, 2500);
        assert_eq!(card.defense, 2100);
        assert_eq!(card.cost, 7);
        assert_eq!(card.attribute.as_deref(), Some("DARK"));
        assert_eq!(card.race.as_deref(), Some("Spellcaster"));
        assert_eq!(
            card.description.as_deref(),
            Some("The ultimate wizard in terms of attack and defense.")
        );
        assert_eq!(
            card.image,
            "https://static.wikia.nocookie.net/yugioh/images/dm.png"
        );
    }

    #[test]
    fn test_card_table_monster() {
        let html = card_table(
            r#"
<tr><td>Card type</td><td>Monster</td></tr>
<tr><td>Attribute</td><td>LIGHT</td></tr>
<tr><td>Types</td><td>Dragon / Normal</td></tr>
<tr><td>Level</td><td>8</td></tr>
<tr><td>ATK</td><td>3000</td></tr>
<tr><td>DEF</td><td>2500</td></tr>
<tr><td>Lore</td><td>This legendary dragon is a powerful engine of destruction.</td></tr>
<tr><td><img src="/images/bewd.png"></td></tr>"#,
        );
        let doc = Html::parse_document(&html);
        let card = extractor().extract(&doc, 1, "Blue-Eyes White Dragon");

        assert_eq!(card.category, CardCategory::Monster);
        assert_eq!(card.level, 8);
        assert_eq!(card.attack, 3000);
        assert_eq!(card.defense, 2500);
        assert_eq!(card.cost, 8);
        assert_eq!(card.attribute.as_deref(), Some("LIGHT"));
        assert_eq!(card.race.as_deref(), Some("Dragon"));
        assert_eq!(card.image, "https://yugioh.fandom.com/images/bewd.png");
        assert!(card.description.unwrap().starts_with("This legendary dragon"));
    }

    #[test]
    fn test_level_noise_rejected() {
        for noise in ["0", "13", "100"] {
            let html = card_table(&format!(
                "<tr><td>Card type</td><td>Monster</td></tr><tr><td>Level</td><td>{noise}</td></tr>"
            ));
            let card = extractor().extract(&Html::parse_document(&html), 5, "Noise");
            assert_eq!(card.level, 0, "level {noise} should be rejected");
            assert_eq!(card.cost, 0);
        }

        let html = card_table(
            "<tr><td>Card type</td><td>Monster</td></tr><tr><td>Level</td><td>12</td></tr>",
        );
        let card = extractor().extract(&Html::parse_document(&html), 5, "Twelve");
        assert_eq!(card.level, 12);
        assert_eq!(card.cost, 12);
    }

    #[test]
    fn test_spell_cost_is_zero() {
        let html = card_table(
            r#"
<tr><td>Card type</td><td>Spell Card</td></tr>
<tr><td>Level</td><td>7</td></tr>
<tr><td>ATK</td><td>1000</td></tr>"#,
        );
        let card = extractor().extract(&Html::parse_document(&html), 30, "Raigeki");
        assert_eq!(card.category, CardCategory::Spell);
        assert_eq!(card.cost, 0);
        assert_eq!(card.level, 0);
    }

    #[test]
    fn test_monster_level_seven_cost_seven() {
        let html = card_table(
            "<tr><td>Card type</td><td>Effect Monster</td></tr><tr><td>Stars</td><td>7</td></tr>",
        );
        let card = extractor().extract(&Html::parse_document(&html), 7, "Red-Eyes Black Dragon");
        assert_eq!(card.cost, 7);
    }

    #[test]
    fn test_infobox_wins_over_table() {
        let html = r#"<html><body><h1>X</h1>
<aside class="portable-infobox">
  <div data-source="atk"><div class="pi-data-value">1200</div></div>
</aside>
<table class="cardtable"><tr><td>ATK</td><td>9999</td></tr><tr><td>DEF</td><td>800</td></tr></table>
</body></html>"#;
        let card = extractor().extract(&Html::parse_document(html), 3, "X");
        assert_eq!(card.attack, 1200);
        assert_eq!(card.defense, 800);
    }

    #[test]
    fn test_variable_attack_keeps_negative_sentinel() {
        let html = r#"<html><body><aside class="portable-infobox">
  <div data-source="atk"><div class="pi-data-value">-1</div></div>
</aside></body></html>"#;
        let card = extractor().extract(&Html::parse_document(html), 5, "Slifer the Sky Dragon");
        assert_eq!(card.attack, -1);
    }

    #[test]
    fn test_defaults_and_placeholder_image() {
        let doc = Html::parse_document("<html><body><p>Nothing here</p></body></html>");
        let card = extractor().extract(&doc, 42, "Mystery Card");
        assert_eq!(card.name, "Mystery Card");
        assert_eq!(card.category, CardCategory::Monster);
        assert_eq!(card.level, 0);
        assert_eq!(card.attack, 0);
        assert_eq!(card.image, "https://images.ygoprodeck.com/images/cards/42.jpg");
        assert!(card.description.is_none());
    }

    #[test]
    fn test_lore_div_and_class_image_fallback() {
        let html = r#"<html><body>
<div class="card-lore">Draw 2 cards.</div>
<img class="card-image" src="data:image/gif;base64,R0lGOD" data-src="https://img.example/pot.png">
</body></html>"#;
        let card = extractor().extract(&Html::parse_document(html), 9, "Pot of Greed");
        assert_eq!(card.description.as_deref(), Some("Draw 2 cards."));
        assert_eq!(card.image, "https://img.example/pot.png");
    }

    #[test]
    fn test_page_title_preference() {
        let doc = Html::parse_document(
            r#"<h1>Other</h1><h1 id="firstHeading">Second</h1><h1 class="page-header__title"> Dark  Magician </h1>"#,
        );
        assert_eq!(page_title(&doc).as_deref(), Some("Dark Magician"));

        let doc = Html::parse_document("<h1>Only Heading</h1>");
        assert_eq!(page_title(&doc).as_deref(), Some("Only Heading"));

        let doc = Html::parse_document("<p>No heading</p>");
        assert_eq!(page_title(&doc), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("ATK 2500 / ?"), Some(2500));
        assert_eq!(parse_number("-1"), Some(-1));
        assert_eq!(parse_number("?"), None);
    }

    #[test]
    fn test_race_from_types() {
        assert_eq!(race_from_types("Dragon / Effect").as_deref(), Some("Dragon"));
        assert_eq!(race_from_types("Dragon"), None);
        assert_eq!(race_from_types(" / Effect"), None);
    }

    #[test]
    fn test_merge_missing_keeps_first() {
        let mut first = PartialCard {
            attack: Some(0),
            ..Default::default()
        };
        first.merge_missing(PartialCard {
            attack: Some(100),
            defense: Some(200),
            ..Default::default()
        });
        assert_eq!(first.attack, Some(0));
        assert_eq!(first.defense, Some(200));
    }
}
