//! # cardcrawl
//!
//! Resolves trading-card names against a MediaWiki-style card wiki and
//! stores the extracted card data in SQLite (or a CSV file).
//!
//! ## Architecture
//!
//! ```text
//! card list → Patterns → Fetcher → Matching → Extractor → Store
//!                  ╰──── search fallback ────╯
//! ```
//!
//! Each card is resolved independently by the [`resolver`]; the [`crawler`]
//! runs many resolutions at once and persists each result as it arrives.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create the schema
//! cardcrawl migrate
//!
//! # Crawl cards 1-10 of data/card_list.csv
//! cardcrawl crawl --start 1 --end 10
//!
//! # Look up one card without touching the database
//! cardcrawl resolve 1 "Blue-Eyes White Dragon"
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config,
/// fetcher, resolver and store.
pub mod app;

/// Command-line interface using clap.
///
/// - `crawl`, `gather`, `resolve` - fetch cards
/// - `migrate`, `check`, `setup` - schema and readiness
/// - `db status|clear-all|clear-table|reset|seed` - maintenance
pub mod cli;

/// Configuration loaded from `~/.config/cardcrawl/config.toml`.
pub mod config;

/// Bounded parallel crawl over a card list.
pub mod crawler;

/// Core domain models.
///
/// - [`CardRecord`](domain::CardRecord): one extracted card
/// - [`Deck`](domain::Deck): a named 40-card list
/// - [`Resolution`](domain::Resolution): outcome of resolving one card
pub mod domain;

/// Field extraction from card pages, one strategy per page layout.
pub mod extractor;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Card list CSV loading and id range selection.
pub mod input;

/// Title normalization and match validation.
pub mod matching;

/// Versioned SQL scripts and the `schema_history` ledger.
pub mod migrations;

/// Candidate page names for a card.
pub mod patterns;

/// Read-only database readiness check.
pub mod probe;

/// Single-card resolution: direct pages, then search.
pub mod resolver;

/// Sample cards and preset decks.
pub mod seed;

/// Persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`CsvSink`](store::CsvSink): CSV output for `gather`
pub mod store;
