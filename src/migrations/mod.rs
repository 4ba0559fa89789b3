//! Versioned schema migrations with a ledger table.
//!
//! Scripts are named `V{version}__{description}.sql`. Each pending script
//! runs in its own transaction together with its `schema_history` row, so a
//! failed script leaves neither schema changes nor a ledger entry behind.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

use rusqlite::{params, Connection};

use crate::app::{CrawlError, Result};

pub const LEDGER_TABLE: &str = "schema_history";

const EMBEDDED: [(&str, &str); 2] = [
    (
        "V1__create_cards.sql",
        include_str!("../../migrations/V1__create_cards.sql"),
    ),
    (
        "V2__create_decks.sql",
        include_str!("../../migrations/V2__create_decks.sql"),
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    pub version: u32,
    pub description: String,
    /// File name the script was loaded from.
    pub script: String,
    pub sql: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    /// Scripts a dry run would have applied.
    pub pending: Vec<String>,
}

/// `V3__add_rarity.sql` → `(3, "add rarity")`.
pub fn parse_filename(name: &str) -> Option<(u32, String)> {
    let stem = name.strip_suffix(".sql")?.strip_prefix('V')?;
    let (version, description) = stem.split_once("__")?;
    let version = version.parse().ok()?;
    Some((version, description.replace('_', " ")))
}

/// Built-in scripts shipped with the binary.
pub fn embedded() -> Result<Vec<MigrationScript>> {
    collect(
        EMBEDDED
            .iter()
            .map(|(name, sql)| (name.to_string(), sql.to_string())),
    )
}

/// Every `V*__*.sql` file in `dir`; other files are ignored.
pub fn load_dir(dir: &Path) -> Result<Vec<MigrationScript>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".sql") {
            continue;
        }
        if parse_filename(name).is_none() {
            tracing::warn!("Ignoring {}: not named V{{version}}__{{description}}.sql", name);
            continue;
        }
        sources.push((name.to_string(), fs::read_to_string(&path)?));
    }
    collect(sources)
}

fn collect(sources: impl IntoIterator<Item = (String, String)>) -> Result<Vec<MigrationScript>> {
    let mut scripts: Vec<MigrationScript> = sources
        .into_iter()
        .filter_map(|(script, sql)| {
            let (version, description) = parse_filename(&script)?;
            Some(MigrationScript {
                version,
                description,
                script,
                sql,
            })
        })
        .collect();
    scripts.sort_by_key(|s| s.version);

    let mut seen = HashSet::new();
    for script in &scripts {
        if !seen.insert(script.version) {
            return Err(CrawlError::Migration {
                script: script.script.clone(),
                message: format!("duplicate version {}", script.version),
            });
        }
    }
    Ok(scripts)
}

fn ledger_exists(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![LEDGER_TABLE],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn installed_versions(conn: &Connection) -> Result<HashSet<u32>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_history WHERE success = 1")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<HashSet<u32>, _>>()?;
    Ok(versions)
}

/// Apply every script not yet recorded as successful, in version order.
///
/// Stops at the first failing script. A dry run only reports what would be
/// applied and leaves the database untouched, ledger included.
pub fn apply(
    conn: &mut Connection,
    scripts: &[MigrationScript],
    dry_run: bool,
) -> Result<MigrationReport> {
    let installed = if ledger_exists(conn)? {
        installed_versions(conn)?
    } else if dry_run {
        HashSet::new()
    } else {
        conn.execute_batch(
            "CREATE TABLE schema_history (
                installed_rank INTEGER PRIMARY KEY AUTOINCREMENT,
                version INTEGER NOT NULL,
                description TEXT NOT NULL,
                script TEXT NOT NULL,
                installed_on TEXT NOT NULL,
                execution_ms INTEGER NOT NULL,
                success INTEGER NOT NULL
            )",
        )?;
        HashSet::new()
    };

    let mut report = MigrationReport::default();
    for script in scripts {
        if installed.contains(&script.version) {
            tracing::debug!("Migration {} already applied", script.script);
            report.skipped.push(script.script.clone());
            continue;
        }
        if dry_run {
            report.pending.push(script.script.clone());
            continue;
        }

        let started = Instant::now();
        let tx = conn.transaction()?;
        if let Err(e) = tx.execute_batch(&script.sql) {
            tracing::error!("Migration {} failed: {}", script.script, e);
            return Err(CrawlError::Migration {
                script: script.script.clone(),
                message: e.to_string(),
            });
        }
        let elapsed = started.elapsed().as_millis() as i64;
        tx.execute(
            "INSERT INTO schema_history (version, description, script, installed_on, execution_ms, success)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![
                script.version,
                script.description,
                script.script,
                chrono::Utc::now().to_rfc3339(),
                elapsed
            ],
        )?;
        tx.commit()?;

        tracing::info!("Applied migration {} ({} ms)", script.script, elapsed);
        report.applied.push(script.script.clone());
    }

    Ok(report)
}
