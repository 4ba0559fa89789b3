//! Configuration management for cardcrawl.
//!
//! Configuration is read from `~/.config/cardcrawl/config.toml` at startup,
//! or from the file given with `--config`. If the default file doesn't exist,
//! one with commented defaults is created.

pub mod wiki;

pub use wiki::WikiConfig;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKERS: usize = 10;
pub const MAX_WORKERS: usize = 50;

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub wiki: WikiConfig,
    pub crawler: CrawlerConfig,
    pub migrations: MigrationsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; `<data_dir>/cardcrawl/cards.db` when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Concurrent resolutions, clamped to 1..=50.
    pub workers: usize,
    /// Emit a progress line every N completed cards.
    pub progress_every: usize,
    /// `id,name` CSV crawled by default.
    pub card_list: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            progress_every: 25,
            card_list: PathBuf::from("data/card_list.csv"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationsConfig {
    /// Directory of `V{n}__{name}.sql` scripts; the built-in set when unset.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used and
    /// created with commented defaults if missing. Missing fields use default
    /// values.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_config_path()?;
                if !path.exists() {
                    Self::create_default_config(&path)?;
                    return Ok(Self::default());
                }
                path
            }
        };

        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/cardcrawl/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("cardcrawl").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Created default config at {}", path.display());
        Ok(())
    }

    /// Default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# cardcrawl configuration

[database]
# SQLite database file. Defaults to <data dir>/cardcrawl/cards.db
# path = "/var/lib/cardcrawl/cards.db"

[wiki]
# Root of the card wiki; page identifiers are appended as a path segment
base_url = "https://yugioh.fandom.com/wiki"

# Search page, relative to base_url
search_path = "Special:Search"

user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"

# Per-request timeout in seconds
timeout_secs = 10

# Used when a page has no usable image; {id} is replaced by the card id
placeholder_image = "https://images.ygoprodeck.com/images/cards/{id}.jpg"

# Search results examined before giving up on a card
max_search_results = 5

[crawler]
# Concurrent card resolutions (1-50)
workers = 10

# Log a progress line every N cards
progress_every = 25

# id,name CSV of cards to crawl
card_list = "data/card_list.csv"

[migrations]
# Directory of V{n}__{description}.sql scripts. Built-in scripts when unset
# dir = "migrations"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
