use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Migration {script} failed: {message}")]
    Migration { script: String, message: String },

    #[error("Table(s) missing: {0}. Run `cardcrawl migrate` first")]
    MissingTables(String),

    #[error("Card list error: {0}")]
    CardList(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
