use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::app::error::{CrawlError, Result};
use crate::config::Config;
use crate::crawler::CrawlDriver;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::migrations::{self, MigrationScript};
use crate::resolver::CardResolver;
use crate::store::sqlite::SqliteStore;

/// Wires configuration, resolver and store together.
///
/// The database is opened on first use so that `check` and `resolve` never
/// create a file.
pub struct AppContext {
    pub config: Config,
    pub resolver: Arc<CardResolver>,
    pub db_path: PathBuf,
    store: OnceCell<Arc<SqliteStore>>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = match &config.database.path {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };
        Self::build(config, db_path, OnceCell::new())
    }

    /// Context backed by an in-memory database with the built-in schema.
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = OnceCell::with_value(Arc::new(SqliteStore::in_memory_migrated()?));
        Self::build(config, PathBuf::from(":memory:"), store)
    }

    fn build(config: Config, db_path: PathBuf, store: OnceCell<Arc<SqliteStore>>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.wiki)?);
        let resolver = Arc::new(CardResolver::new(fetcher, &config.wiki)?);

        Ok(Self {
            config,
            resolver,
            db_path,
            store,
        })
    }

    pub fn store(&self) -> Result<Arc<SqliteStore>> {
        self.store
            .get_or_try_init(|| SqliteStore::new(&self.db_path).map(Arc::new))
            .cloned()
    }

    /// Scripts from `[migrations] dir`, or the built-in set.
    pub fn migrations(&self) -> Result<Vec<MigrationScript>> {
        match &self.config.migrations.dir {
            Some(dir) => migrations::load_dir(dir),
            None => migrations::embedded(),
        }
    }

    pub fn driver(&self) -> CrawlDriver {
        CrawlDriver::new(self.resolver.clone(), &self.config.crawler)
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| CrawlError::Config("Could not find data directory".into()))?;
        Ok(data_dir.join("cardcrawl").join("cards.db"))
    }
}
