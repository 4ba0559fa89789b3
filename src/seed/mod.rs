//! Built-in sample cards and preset decks for `db seed`.

mod data;

use crate::domain::{CardCategory, CardRecord, Deck};
use crate::store::Store;

pub use data::{SAMPLE_CARDS, SAMPLE_DECKS};

pub struct SampleCard {
    pub id: i64,
    pub name: &'static str,
    pub level: u32,
    pub attack: i32,
    pub defense: i32,
    pub description: &'static str,
    pub image: &'static str,
    pub attribute: &'static str,
    pub race: &'static str,
    pub rarity: &'static str,
}

impl SampleCard {
    pub fn to_record(&self) -> CardRecord {
        let mut card = CardRecord::new(self.id, self.name, self.image);
        card.category = CardCategory::Monster;
        card.level = self.level;
        card.attack = self.attack;
        card.defense = self.defense;
        card.cost = CardRecord::derive_cost(card.category, card.level);
        card.description = Some(self.description.to_string());
        card.attribute = Some(self.attribute.to_string());
        card.race = Some(self.race.to_string());
        card.rarity = Some(self.rarity.to_string());
        card
    }
}

pub struct SampleDeck {
    pub name: &'static str,
    pub description: &'static str,
    pub character_name: &'static str,
    pub archetype: &'static str,
    pub max_cost: u32,
    /// Repeated to fill the deck.
    pub pattern: &'static [i64],
}

impl SampleDeck {
    pub fn to_deck(&self) -> Deck {
        Deck {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            character_name: Some(self.character_name.to_string()),
            archetype: Some(self.archetype.to_string()),
            max_cost: self.max_cost,
            is_preset: true,
            card_ids: Deck::expand_pattern(self.pattern),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: usize,
    pub failed: usize,
}

/// Upsert sample cards with ids inside the optional bounds. Each card is
/// written on its own; a failing card is logged and the rest continue.
pub fn seed_cards<S: Store + ?Sized>(store: &S, start: Option<i64>, end: Option<i64>) -> SeedReport {
    let selected: Vec<&SampleCard> = SAMPLE_CARDS
        .iter()
        .filter(|c| start.map_or(true, |s| c.id >= s) && end.map_or(true, |e| c.id <= e))
        .collect();

    if selected.is_empty() {
        tracing::warn!("No sample cards in the requested range");
    }

    let mut report = SeedReport::default();
    for sample in selected {
        let card = sample.to_record();
        match store.upsert_card(&card) {
            Ok(()) => {
                tracing::info!("  → {}", card.preview());
                report.seeded += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to seed card #{}: {}", card.id, e);
                report.failed += 1;
            }
        }
    }
    report
}

/// Upsert preset decks by name, replacing their card lists.
pub fn seed_decks<S: Store + ?Sized>(store: &S) -> SeedReport {
    let mut report = SeedReport::default();
    for sample in SAMPLE_DECKS.iter() {
        let deck = sample.to_deck();
        match store.upsert_deck(&deck) {
            Ok(_) => {
                tracing::info!("  → Deck '{}' ({} cards)", deck.name, deck.card_ids.len());
                report.seeded += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to seed deck '{}': {}", deck.name, e);
                report.failed += 1;
            }
        }
    }
    report
}
