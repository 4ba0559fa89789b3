pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::store::ManagedTable;

#[derive(Parser)]
#[command(name = "cardcrawl")]
#[command(about = "Crawl a card wiki into a local card database", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/cardcrawl/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Number of parallel workers (1-50)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a range of the card list into the database
    Crawl {
        /// First card id
        #[arg(long, default_value_t = 1)]
        start: i64,
        /// Last card id
        #[arg(long, default_value_t = 10)]
        end: i64,
        /// Card list (default: [crawler] card_list)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Crawl the card list into a CSV file instead of the database
    Gather {
        #[arg(long)]
        start: Option<i64>,
        #[arg(long)]
        end: Option<i64>,
        /// Output CSV, replaced if it exists
        #[arg(short, long, default_value = "data/cards_data.csv")]
        output: PathBuf,
        /// Card list (default: [crawler] card_list)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Resolve a single card and print it as JSON
    Resolve {
        id: i64,
        name: String,
    },
    /// Apply pending schema migrations
    Migrate {
        /// Script directory (default: [migrations] dir or built-in scripts)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Report pending scripts without running them
        #[arg(long)]
        dry_run: bool,
    },
    /// Report database readiness through the exit code
    Check,
    /// Migrate and crawl only when the database needs it
    Setup {
        /// Card id range crawled into an empty database
        #[arg(long, num_args = 2, value_names = ["START", "END"], default_values_t = [1, 10])]
        seed_range: Vec<i64>,
        /// Card list (default: [crawler] card_list)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
pub enum DbAction {
    /// Row counts and card id range
    Status,
    /// Delete every row from cards, decks and deck_cards
    ClearAll,
    /// Delete every row from one table
    ClearTable {
        table: ManagedTable,
    },
    /// Drop every table, migration history included
    Reset,
    /// Insert the built-in sample cards and preset decks
    Seed {
        /// Seed only cards
        #[arg(long)]
        cards: bool,
        /// Seed only decks
        #[arg(long)]
        decks: bool,
        /// Lowest sample card id
        #[arg(long)]
        start: Option<i64>,
        /// Highest sample card id
        #[arg(long)]
        end: Option<i64>,
    },
}
