use serde::{Deserialize, Serialize};

pub const DECK_SIZE: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub description: Option<String>,
    pub character_name: Option<String>,
    pub archetype: Option<String>,
    pub max_cost: u32,
    pub is_preset: bool,
    /// Card ids by position, starting at position 1.
    pub card_ids: Vec<i64>,
}

impl Deck {
    /// Repeat `pattern` cyclically until the deck is full.
    pub fn expand_pattern(pattern: &[i64]) -> Vec<i64> {
        if pattern.is_empty() {
            return Vec::new();
        }
        pattern.iter().copied().cycle().take(DECK_SIZE).collect()
    }
}
