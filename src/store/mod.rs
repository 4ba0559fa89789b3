pub mod csv_sink;
pub mod sqlite;

use std::fmt;
use std::str::FromStr;

use crate::app::{CrawlError, Result};
use crate::domain::{CardRecord, Deck};
use crate::migrations::{MigrationReport, MigrationScript};

pub use csv_sink::CsvSink;
pub use sqlite::SqliteStore;

/// Destination for resolved cards. Called from many crawl tasks at once.
pub trait CardSink {
    fn save_card(&self, card: &CardRecord) -> Result<()>;
}

/// Tables owned by the card schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedTable {
    Cards,
    Decks,
    DeckCards,
}

impl ManagedTable {
    /// Children first, so deleting in this order satisfies foreign keys.
    pub const ALL: [ManagedTable; 3] = [Self::DeckCards, Self::Decks, Self::Cards];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cards => "cards",
            Self::Decks => "decks",
            Self::DeckCards => "deck_cards",
        }
    }
}

impl fmt::Display for ManagedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManagedTable {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cards" => Ok(Self::Cards),
            "decks" => Ok(Self::Decks),
            "deck_cards" => Ok(Self::DeckCards),
            other => Err(CrawlError::Other(format!(
                "Unknown table '{}' (expected cards, decks or deck_cards)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStatus {
    /// Row count per table; `None` when the table does not exist.
    pub tables: Vec<(ManagedTable, Option<i64>)>,
    pub card_id_range: Option<(i64, i64)>,
}

pub trait Store: CardSink {
    // Card operations
    fn upsert_card(&self, card: &CardRecord) -> Result<()>;
    fn get_card(&self, id: i64) -> Result<Option<CardRecord>>;
    fn card_count(&self) -> Result<i64>;
    fn card_id_range(&self) -> Result<Option<(i64, i64)>>;

    // Deck operations
    fn upsert_deck(&self, deck: &Deck) -> Result<i64>;
    fn get_deck_cards(&self, name: &str) -> Result<Vec<i64>>;

    // Schema operations
    fn table_exists(&self, table: &str) -> Result<bool>;
    fn require_tables(&self, tables: &[ManagedTable]) -> Result<()>;
    fn status(&self) -> Result<DbStatus>;
    fn clear_tables(&self, tables: &[ManagedTable]) -> Result<()>;
    fn reset_schema(&self) -> Result<Vec<String>>;
    fn apply_migrations(&self, scripts: &[MigrationScript], dry_run: bool)
        -> Result<MigrationReport>;
}
