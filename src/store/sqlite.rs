use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::app::{CrawlError, Result};
use crate::domain::{CardCategory, CardRecord, Deck};
use crate::migrations::{self, MigrationReport, MigrationScript};
use crate::store::{CardSink, DbStatus, ManagedTable, Store};

const CARD_COLUMNS: &str = "id, name, description, image, type, attribute, race, level,
    attack_points, defense_points, cost, rarity";

/// SQLite-backed store. The schema is owned by the migration runner; opening
/// a store never creates tables.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// In-memory store with the built-in schema applied.
    pub fn in_memory_migrated() -> Result<Self> {
        let store = Self::in_memory()?;
        store.apply_migrations(&migrations::embedded()?, false)?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            CrawlError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn card_from_row(row: &Row) -> rusqlite::Result<CardRecord> {
        let category: String = row.get(4)?;
        Ok(CardRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            image: row.get(3)?,
            category: CardCategory::parse(&category).unwrap_or_default(),
            attribute: row.get(5)?,
            race: row.get(6)?,
            level: row.get(7)?,
            attack: row.get(8)?,
            defense: row.get(9)?,
            cost: row.get(10)?,
            rarity: row.get(11)?,
        })
    }

    fn table_exists_in(conn: &Connection, table: &str) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn missing_tables(conn: &Connection, tables: &[ManagedTable]) -> Result<Vec<&'static str>> {
        let mut missing = Vec::new();
        for table in tables {
            if !Self::table_exists_in(conn, table.as_str())? {
                missing.push(table.as_str());
            }
        }
        Ok(missing)
    }
}

impl CardSink for SqliteStore {
    fn save_card(&self, card: &CardRecord) -> Result<()> {
        self.upsert_card(card)
    }
}

impl Store for SqliteStore {
    fn upsert_card(&self, card: &CardRecord) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO cards (id, name, description, image, type, attribute, race, level,
                                attack_points, defense_points, cost, rarity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                image = excluded.image,
                type = excluded.type,
                attribute = excluded.attribute,
                race = excluded.race,
                level = excluded.level,
                attack_points = excluded.attack_points,
                defense_points = excluded.defense_points,
                cost = excluded.cost,
                rarity = excluded.rarity,
                updated_at = CURRENT_TIMESTAMP",
            params![
                card.id,
                card.name,
                card.description,
                card.image,
                card.category.as_str(),
                card.attribute,
                card.race,
                card.level,
                card.attack,
                card.defense,
                card.cost,
                card.rarity,
            ],
        )?;

        Ok(())
    }

    fn get_card(&self, id: i64) -> Result<Option<CardRecord>> {
        let conn = self.conn()?;

        let card = conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id],
                Self::card_from_row,
            )
            .optional()?;

        Ok(card)
    }

    fn card_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    fn card_id_range(&self) -> Result<Option<(i64, i64)>> {
        let conn = self.conn()?;
        let range: (Option<i64>, Option<i64>) =
            conn.query_row("SELECT MIN(id), MAX(id) FROM cards", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
        Ok(range.0.zip(range.1))
    }

    fn upsert_deck(&self, deck: &Deck) -> Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let deck_id: i64 = tx.query_row(
            "INSERT INTO decks (name, description, character_name, archetype, max_cost, is_preset)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(name) DO UPDATE SET
                description = excluded.description,
                character_name = excluded.character_name,
                archetype = excluded.archetype,
                max_cost = excluded.max_cost,
                is_preset = excluded.is_preset,
                updated_at = CURRENT_TIMESTAMP
             RETURNING id",
            params![
                deck.name,
                deck.description,
                deck.character_name,
                deck.archetype,
                deck.max_cost,
                deck.is_preset,
            ],
            |row| row.get(0),
        )?;

        tx.execute("DELETE FROM deck_cards WHERE deck_id = ?1", params![deck_id])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO deck_cards (deck_id, card_id, position) VALUES (?1, ?2, ?3)",
            )?;
            for (index, card_id) in deck.card_ids.iter().enumerate() {
                stmt.execute(params![deck_id, card_id, index as i64 + 1])?;
            }
        }

        tx.commit()?;
        Ok(deck_id)
    }

    fn get_deck_cards(&self, name: &str) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT dc.card_id FROM deck_cards dc
             JOIN decks d ON d.id = dc.deck_id
             WHERE d.name = ?1
             ORDER BY dc.position",
        )?;
        let ids = stmt
            .query_map(params![name], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let conn = self.conn()?;
        Self::table_exists_in(&conn, table)
    }

    fn require_tables(&self, tables: &[ManagedTable]) -> Result<()> {
        let conn = self.conn()?;
        let missing = Self::missing_tables(&conn, tables)?;
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CrawlError::MissingTables(missing.join(", ")))
        }
    }

    fn status(&self) -> Result<DbStatus> {
        let conn = self.conn()?;

        let mut tables = Vec::new();
        for table in [ManagedTable::Cards, ManagedTable::Decks, ManagedTable::DeckCards] {
            let count = if Self::table_exists_in(&conn, table.as_str())? {
                let count: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM {}", table.as_str()),
                    [],
                    |row| row.get(0),
                )?;
                Some(count)
            } else {
                None
            };
            tables.push((table, count));
        }

        let card_id_range = if Self::table_exists_in(&conn, "cards")? {
            let (min, max): (Option<i64>, Option<i64>) =
                conn.query_row("SELECT MIN(id), MAX(id) FROM cards", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?;
            min.zip(max)
        } else {
            None
        };

        Ok(DbStatus {
            tables,
            card_id_range,
        })
    }

    fn clear_tables(&self, tables: &[ManagedTable]) -> Result<()> {
        let mut conn = self.conn()?;
        let missing = Self::missing_tables(&conn, tables)?;
        if !missing.is_empty() {
            return Err(CrawlError::MissingTables(missing.join(", ")));
        }

        let tx = conn.transaction()?;
        for table in ManagedTable::ALL.iter().filter(|t| tables.contains(*t)) {
            let deleted = tx.execute(&format!("DELETE FROM {}", table.as_str()), [])?;
            tracing::info!("Cleared {} row(s) from {}", deleted, table);
        }
        tx.commit()?;
        Ok(())
    }

    fn reset_schema(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let names = {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            )?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            names
        };

        conn.execute_batch("PRAGMA foreign_keys = OFF")?;
        let dropped = names.iter().try_for_each(|name| {
            conn.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\"", name.replace('"', "\"\"")))
        });
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        dropped?;

        for name in &names {
            tracing::info!("Dropped table {}", name);
        }
        Ok(names)
    }

    fn apply_migrations(
        &self,
        scripts: &[MigrationScript],
        dry_run: bool,
    ) -> Result<MigrationReport> {
        let mut conn = self.conn()?;
        migrations::apply(&mut conn, scripts, dry_run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::in_memory_migrated().unwrap()
    }

    fn dragon() -> CardRecord {
        let mut card = CardRecord::new(1, "Blue-Eyes White Dragon", "https://img/1.jpg");
        card.level = 8;
        card.attack = 3000;
        card.defense = 2500;
        card.cost = 8;
        card.attribute = Some("LIGHT".into());
        card
    }

    #[test]
    fn test_upsert_and_get_card() {
        let store = store();
        store.upsert_card(&dragon()).unwrap();

        let card = store.get_card(1).unwrap().unwrap();
        assert_eq!(card, dragon());
        assert_eq!(store.card_count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_overwrites_every_column() {
        let store = store();
        store.upsert_card(&dragon()).unwrap();

        let mut spell = CardRecord::new(1, "Raigeki", "https://img/raigeki.jpg");
        spell.category = CardCategory::Spell;
        spell.description = Some("Destroy all monsters your opponent controls.".into());
        store.save_card(&spell).unwrap();

        let card = store.get_card(1).unwrap().unwrap();
        assert_eq!(card, spell);
        assert_eq!(card.attribute, None);
        assert_eq!(store.card_count().unwrap(), 1);
    }

    #[test]
    fn test_negative_sentinel_stats_round_trip() {
        let store = store();
        let mut card = CardRecord::new(5, "Slifer the Sky Dragon", "https://img/5.jpg");
        card.attack = -1;
        card.defense = -1;
        store.upsert_card(&card).unwrap();
        assert_eq!(store.get_card(5).unwrap().unwrap().attack, -1);
    }

    #[test]
    fn test_get_card_nonexistent() {
        assert!(store().get_card(999).unwrap().is_none());
    }

    #[test]
    fn test_card_id_range() {
        let store = store();
        assert_eq!(store.card_id_range().unwrap(), None);
        for id in [7, 3, 12] {
            store
                .upsert_card(&CardRecord::new(id, format!("Card {id}"), "img"))
                .unwrap();
        }
        assert_eq!(store.card_id_range().unwrap(), Some((3, 12)));
    }

    #[test]
    fn test_store_does_not_create_schema() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(!store.table_exists("cards").unwrap());
        let err = store.require_tables(&[ManagedTable::Cards]).unwrap_err();
        assert!(matches!(err, CrawlError::MissingTables(ref t) if t == "cards"));
        assert!(store.upsert_card(&dragon()).is_err());
    }

    #[test]
    fn test_upsert_deck_replaces_card_list() {
        let store = store();
        for id in 1..=3 {
            store
                .upsert_card(&CardRecord::new(id, format!("Card {id}"), "img"))
                .unwrap();
        }
        let mut deck = Deck {
            name: "Starter".into(),
            description: None,
            character_name: None,
            archetype: None,
            max_cost: 100,
            is_preset: true,
            card_ids: vec![1, 2, 3],
        };
        let first = store.upsert_deck(&deck).unwrap();

        deck.card_ids = vec![3, 3];
        let second = store.upsert_deck(&deck).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get_deck_cards("Starter").unwrap(), vec![3, 3]);
    }

    #[test]
    fn test_deck_with_unknown_card_rolls_back() {
        let store = store();
        let deck = Deck {
            name: "Broken".into(),
            description: None,
            character_name: None,
            archetype: None,
            max_cost: 0,
            is_preset: false,
            card_ids: vec![404],
        };
        assert!(store.upsert_deck(&deck).is_err());
        assert_eq!(store.status().unwrap().tables[1], (ManagedTable::Decks, Some(0)));
    }

    #[test]
    fn test_status_and_clear() {
        let store = store();
        store.upsert_card(&dragon()).unwrap();

        let status = store.status().unwrap();
        assert_eq!(status.tables[0], (ManagedTable::Cards, Some(1)));
        assert_eq!(status.card_id_range, Some((1, 1)));

        store.clear_tables(&ManagedTable::ALL).unwrap();
        assert_eq!(store.card_count().unwrap(), 0);
    }

    #[test]
    fn test_reset_drops_everything() {
        let store = store();
        let dropped = store.reset_schema().unwrap();
        assert!(dropped.contains(&"schema_history".to_string()));
        assert!(!store.table_exists("cards").unwrap());

        let status = store.status().unwrap();
        assert!(status.tables.iter().all(|(_, count)| count.is_none()));
        assert!(matches!(
            store.clear_tables(&[ManagedTable::Decks]),
            Err(CrawlError::MissingTables(_))
        ));
    }
}
