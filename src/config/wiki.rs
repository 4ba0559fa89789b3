use serde::{Deserialize, Serialize};
use url::Url;

/// Where and how card pages are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    pub base_url: String,
    pub search_path: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// May contain `{id}`.
    pub placeholder_image: String,
    pub max_search_results: usize,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://yugioh.fandom.com/wiki".to_string(),
            search_path: "Special:Search".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            timeout_secs: 10,
            placeholder_image: "https://images.ygoprodeck.com/images/cards/{id}.jpg".to_string(),
            max_search_results: 5,
        }
    }
}

impl WikiConfig {
    /// `base_url` parsed, without a trailing slash in its path.
    pub fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.trim_end_matches('/'))
    }
}
