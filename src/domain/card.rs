use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardCategory {
    #[default]
    Monster,
    Spell,
    Trap,
}

impl CardCategory {
    /// Classify raw category text by containment, checking Monster, Spell, Trap in that order.
    pub fn from_raw(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("monster") {
            Some(Self::Monster)
        } else if lower.contains("spell") {
            Some(Self::Spell)
        } else if lower.contains("trap") {
            Some(Self::Trap)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monster => "Monster",
            Self::Spell => "Spell",
            Self::Trap => "Trap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Monster" => Some(Self::Monster),
            "Spell" => Some(Self::Spell),
            "Trap" => Some(Self::Trap),
            _ => None,
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved card, shaped like a row of the `cards` table.
///
/// Field order matches the CSV export columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: i64,
    /// Always the name from the card list, never the scraped page title.
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    #[serde(rename = "type")]
    pub category: CardCategory,
    pub attribute: Option<String>,
    pub race: Option<String>,
    pub level: u32,
    #[serde(rename = "attack_points")]
    pub attack: i32,
    #[serde(rename = "defense_points")]
    pub defense: i32,
    pub cost: u32,
    pub rarity: Option<String>,
}

impl CardRecord {
    pub fn new(id: i64, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            image: image.into(),
            category: CardCategory::Monster,
            attribute: None,
            race: None,
            level: 0,
            attack: 0,
            defense: 0,
            cost: 0,
            rarity: None,
        }
    }

    /// Cost is the level for monsters and zero for everything else.
    pub fn derive_cost(category: CardCategory, level: u32) -> u32 {
        match category {
            CardCategory::Monster => level,
            CardCategory::Spell | CardCategory::Trap => 0,
        }
    }

    /// Tributes needed to normal summon this card.
    pub fn tributes(&self) -> u32 {
        match self.level {
            0..=4 => 0,
            5 | 6 => 1,
            7..=10 => {
                let mentions_three = self.description.as_deref().is_some_and(|d| {
                    let d = d.to_lowercase();
                    d.contains("3 tribute") || d.contains("three tribute")
                });
                if mentions_three {
                    3
                } else {
                    2
                }
            }
            _ => 3,
        }
    }

    /// One-line summary used in crawl and seed logs.
    pub fn preview(&self) -> String {
        let mut preview = format!("Card #{:03}: {} ({})", self.id, self.name, self.category);
        if self.category != CardCategory::Monster {
            return preview;
        }
        if self.level > 0 {
            preview.push_str(&format!(" [Lv.{}]", self.level));
        }
        if let Some(attribute) = &self.attribute {
            preview.push_str(&format!(" [{}]", attribute));
        }
        if self.attack > 0 || self.defense > 0 {
            preview.push_str(&format!(" ATK:{}/DEF:{}", self.attack, self.defense));
        }
        let tributes = self.tributes();
        if tributes > 0 {
            preview.push_str(&format!(" (Tributes: {})", tributes));
        }
        preview
    }
}
