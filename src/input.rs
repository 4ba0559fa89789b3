//! The `id,name` card list and id range selection.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::app::{CrawlError, Result};
use crate::domain::CardTask;

#[derive(Debug, Deserialize)]
struct CardListRow {
    id: i64,
    name: String,
}

/// Every usable `(id, name)` pair in the list, keyed by id.
///
/// Rows with a non-positive id, an empty name or unparseable fields are
/// skipped with a warning. A later row with the same id replaces an earlier
/// one.
pub fn load_card_list(path: &Path) -> Result<BTreeMap<i64, String>> {
    if !path.exists() {
        return Err(CrawlError::CardList(format!(
            "{} not found (expected a CSV with columns id,name)",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut cards = BTreeMap::new();
    for (index, row) in reader.deserialize::<CardListRow>().enumerate() {
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping line {} of {}: {}", line, path.display(), e);
                continue;
            }
        };
        if row.id <= 0 || row.name.is_empty() {
            tracing::warn!("Skipping line {} of {}: invalid id or empty name", line, path.display());
            continue;
        }
        if let Some(previous) = cards.insert(row.id, row.name) {
            tracing::warn!("Card #{} listed twice; replacing '{}'", row.id, previous);
        }
    }

    if cards.is_empty() {
        return Err(CrawlError::CardList(format!(
            "no cards found in {}",
            path.display()
        )));
    }
    Ok(cards)
}

/// Inclusive id bounds actually used for a crawl: `start` is raised to the
/// smallest listed id, `end` lowered to the largest, and the pair swapped if
/// that leaves it inverted.
pub fn clamp_range(cards: &BTreeMap<i64, String>, start: i64, end: i64) -> Option<(i64, i64)> {
    let (&min, _) = cards.first_key_value()?;
    let (&max, _) = cards.last_key_value()?;
    let start = start.max(min);
    let end = end.min(max);
    Some(if start > end { (end, start) } else { (start, end) })
}

fn tasks_between(cards: &BTreeMap<i64, String>, start: i64, end: i64) -> Result<Vec<CardTask>> {
    let tasks: Vec<CardTask> = cards
        .range(start..=end)
        .map(|(&id, name)| CardTask::new(id, name.clone()))
        .collect();
    if tasks.is_empty() {
        return Err(CrawlError::CardList(format!(
            "no cards found in range [{}, {}]",
            start, end
        )));
    }
    Ok(tasks)
}

/// Cards for `crawl --start --end`.
pub fn select_range(cards: &BTreeMap<i64, String>, start: i64, end: i64) -> Result<Vec<CardTask>> {
    let (start, end) = clamp_range(cards, start, end)
        .ok_or_else(|| CrawlError::CardList("card list is empty".into()))?;
    tasks_between(cards, start, end)
}

/// Cards for `gather`: everything unless a bound is given; a missing bound
/// defaults to the smallest or largest listed id.
pub fn select_bounds(
    cards: &BTreeMap<i64, String>,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<Vec<CardTask>> {
    let (Some((&min, _)), Some((&max, _))) = (cards.first_key_value(), cards.last_key_value()) else {
        return Err(CrawlError::CardList("card list is empty".into()));
    };
    let start = start.unwrap_or(min);
    let end = end.unwrap_or(max);
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    tasks_between(cards, start, end)
}
