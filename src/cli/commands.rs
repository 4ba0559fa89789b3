use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::{AppContext, CrawlError, Result};
use crate::crawler::CrawlSummary;
use crate::domain::{CardTask, Resolution};
use crate::input;
use crate::migrations::MigrationReport;
use crate::probe::{self, DbState};
use crate::seed::{self, SeedReport};
use crate::store::{CsvSink, ManagedTable, Store};

fn card_list_path(ctx: &AppContext, csv: Option<&Path>) -> PathBuf {
    csv.map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.config.crawler.card_list.clone())
}

fn print_summary(summary: &CrawlSummary) {
    println!();
    println!(
        "Crawl complete: {} saved, {} skipped, {} total",
        summary.succeeded,
        summary.skipped.len(),
        summary.total
    );
    if !summary.skipped.is_empty() {
        println!("Skipped cards:");
        let mut skipped: Vec<_> = summary.skipped.iter().collect();
        skipped.sort_by_key(|s| s.id);
        for card in skipped {
            println!("  #{} '{}': {}", card.id, card.name, card.reason);
        }
    }
}

/// Resolve cards `start..=end` of the card list into the database.
pub async fn crawl(ctx: &AppContext, start: i64, end: i64, csv: Option<&Path>) -> Result<CrawlSummary> {
    let store = ctx.store()?;
    store.require_tables(&[ManagedTable::Cards])?;

    let cards = input::load_card_list(&card_list_path(ctx, csv))?;
    let tasks = input::select_range(&cards, start, end)?;
    if let (Some(first), Some(last)) = (tasks.first(), tasks.last()) {
        println!("Crawling cards #{} to #{} ({} cards)", first.id, last.id, tasks.len());
    }

    let summary = ctx.driver().run(tasks, store).await;
    print_summary(&summary);
    Ok(summary)
}

/// Resolve the card list into a CSV file.
pub async fn gather(
    ctx: &AppContext,
    start: Option<i64>,
    end: Option<i64>,
    output: &Path,
    csv: Option<&Path>,
) -> Result<CrawlSummary> {
    let cards = input::load_card_list(&card_list_path(ctx, csv))?;
    let tasks = input::select_bounds(&cards, start, end)?;
    let sink = Arc::new(CsvSink::create(output)?);

    println!("Gathering {} cards into {}", tasks.len(), output.display());
    let summary = ctx.driver().run(tasks, sink).await;
    print_summary(&summary);
    Ok(summary)
}

pub async fn resolve(ctx: &AppContext, id: i64, name: &str) -> Result<()> {
    match ctx.resolver.resolve(&CardTask::new(id, name)).await {
        Resolution::Found(card) => {
            let json = serde_json::to_string_pretty(&card)
                .map_err(|e| CrawlError::Other(e.to_string()))?;
            println!("{}", json);
            Ok(())
        }
        Resolution::Failed(failure) => Err(CrawlError::Other(format!(
            "Card #{} '{}' not resolved: {}",
            id, name, failure
        ))),
    }
}

pub fn migrate(ctx: &AppContext, dir: Option<&Path>, dry_run: bool) -> Result<MigrationReport> {
    let scripts = match dir {
        Some(dir) => crate::migrations::load_dir(dir)?,
        None => ctx.migrations()?,
    };
    let report = ctx.store()?.apply_migrations(&scripts, dry_run)?;

    if dry_run {
        if report.pending.is_empty() {
            println!("Schema is up to date");
        }
        for script in &report.pending {
            println!("Pending: {}", script);
        }
    } else {
        for script in &report.applied {
            println!("Applied: {}", script);
        }
        println!(
            "Migrations complete: {} applied, {} already applied",
            report.applied.len(),
            report.skipped.len()
        );
    }
    Ok(report)
}

pub fn check(ctx: &AppContext) -> DbState {
    let state = probe::probe(&ctx.db_path);
    println!("{}: {}", ctx.db_path.display(), state);
    state
}

/// Bring a database to a usable state: migrate and crawl when the schema is
/// missing, crawl when the card table is empty, nothing when populated.
pub async fn setup(ctx: &AppContext, start: i64, end: i64, csv: Option<&Path>) -> Result<()> {
    match probe::probe(&ctx.db_path) {
        DbState::SchemaMissing => {
            println!("No card schema found; running migrations");
            migrate(ctx, None, false)?;
            crawl(ctx, start, end, csv).await?;
        }
        DbState::Empty => {
            println!("Card table is empty; crawling cards #{} to #{}", start, end);
            crawl(ctx, start, end, csv).await?;
        }
        DbState::Populated(count) => {
            println!("Database already has {} cards; nothing to do", count);
        }
        state @ (DbState::Unreachable(_) | DbState::Failed(_)) => {
            return Err(CrawlError::Other(format!(
                "{}: {}",
                ctx.db_path.display(),
                state
            )));
        }
    }
    Ok(())
}

pub fn db_status(ctx: &AppContext) -> Result<()> {
    let status = ctx.store()?.status()?;

    println!("Database: {}", ctx.db_path.display());
    for (table, count) in &status.tables {
        match count {
            Some(count) => println!("  {:<11} {} rows", table.as_str(), count),
            None => println!("  {:<11} missing", table.as_str()),
        }
    }
    match status.card_id_range {
        Some((min, max)) => println!("  card ids    {}..={}", min, max),
        None => println!("  card ids    none"),
    }
    Ok(())
}

pub fn clear_tables(ctx: &AppContext, tables: &[ManagedTable]) -> Result<()> {
    ctx.store()?.clear_tables(tables)?;
    let names: Vec<&str> = tables.iter().map(ManagedTable::as_str).collect();
    println!("Cleared {}", names.join(", "));
    Ok(())
}

pub fn reset(ctx: &AppContext) -> Result<()> {
    let dropped = ctx.store()?.reset_schema()?;
    if dropped.is_empty() {
        println!("No tables to drop");
    } else {
        println!("Dropped {}", dropped.join(", "));
    }
    Ok(())
}

/// Seed both cards and decks unless exactly one of them is requested.
pub fn seed(
    ctx: &AppContext,
    cards: bool,
    decks: bool,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<(SeedReport, SeedReport)> {
    let store = ctx.store()?;
    let (cards, decks) = if !cards && !decks { (true, true) } else { (cards, decks) };

    let mut required = Vec::new();
    if cards {
        required.push(ManagedTable::Cards);
    }
    if decks {
        required.extend([ManagedTable::Decks, ManagedTable::DeckCards]);
    }
    store.require_tables(&required)?;

    let card_report = if cards {
        let report = seed::seed_cards(store.as_ref(), start, end);
        println!("Seeded {} cards ({} failed)", report.seeded, report.failed);
        report
    } else {
        SeedReport::default()
    };
    let deck_report = if decks {
        let report = seed::seed_decks(store.as_ref());
        println!("Seeded {} decks ({} failed)", report.seeded, report.failed);
        report
    } else {
        SeedReport::default()
    };
    Ok((card_report, deck_report))
}
