//! Database readiness check used by `check` and `setup`.

use std::fmt;
use std::path::Path;

use rusqlite::{Connection, ErrorCode, OpenFlags};

/// What a card database looks like from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbState {
    /// No database file, or no `cards` table in it.
    SchemaMissing,
    Empty,
    Populated(i64),
    /// The file exists but is not a usable SQLite database.
    Unreachable(String),
    Failed(String),
}

impl DbState {
    /// Process exit code reported by `cardcrawl check`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SchemaMissing => 0,
            Self::Empty => 1,
            Self::Populated(_) => 2,
            Self::Unreachable(_) => 3,
            Self::Failed(_) => 4,
        }
    }
}

impl fmt::Display for DbState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMissing => f.write_str("schema missing (no cards table)"),
            Self::Empty => f.write_str("cards table is empty"),
            Self::Populated(count) => write!(f, "cards table has {} row(s)", count),
            Self::Unreachable(reason) => write!(f, "cannot open database: {}", reason),
            Self::Failed(reason) => write!(f, "check failed: {}", reason),
        }
    }
}

fn is_unreachable(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(ErrorCode::CannotOpen | ErrorCode::NotADatabase)
    )
}

/// Inspect the database at `path` without creating or modifying it.
pub fn probe(path: &Path) -> DbState {
    if !path.exists() {
        return DbState::SchemaMissing;
    }

    let conn = match Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
        Ok(conn) => conn,
        Err(e) => return DbState::Unreachable(e.to_string()),
    };

    let tables: rusqlite::Result<i64> = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'cards'",
        [],
        |row| row.get(0),
    );
    match tables {
        Ok(0) => return DbState::SchemaMissing,
        Ok(_) => {}
        Err(e) if is_unreachable(&e) => return DbState::Unreachable(e.to_string()),
        Err(e) => return DbState::Failed(e.to_string()),
    }

    match conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get::<_, i64>(0)) {
        Ok(0) => DbState::Empty,
        Ok(count) => DbState::Populated(count),
        Err(e) if is_unreachable(&e) => DbState::Unreachable(e.to_string()),
        Err(e) => DbState::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardRecord;
    use crate::store::{SqliteStore, Store};

    #[test]
    fn test_missing_file_is_schema_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = probe(&dir.path().join("absent.db"));
        assert_eq!(state, DbState::SchemaMissing);
        assert_eq!(state.exit_code(), 0);
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn test_database_without_cards_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.db");
        SqliteStore::new(&path).unwrap();
        assert_eq!(probe(&path).exit_code(), 0);
    }

    #[test]
    fn test_empty_and_populated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.db");
        let store = SqliteStore::new(&path).unwrap();
        store
            .apply_migrations(&crate::migrations::embedded().unwrap(), false)
            .unwrap();
        assert_eq!(probe(&path), DbState::Empty);
        assert_eq!(probe(&path).exit_code(), 1);

        store
            .upsert_card(&CardRecord::new(1, "Kuriboh", "img"))
            .unwrap();
        assert_eq!(probe(&path), DbState::Populated(1));
        assert_eq!(probe(&path).exit_code(), 2);
    }

    #[test]
    fn test_garbage_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.db");
        std::fs::write(&path, "this is not a sqlite database, just some text padding it out").unwrap();
        assert_eq!(probe(&path).exit_code(), 3);
    }
}
