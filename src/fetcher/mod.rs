pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Retrieves a page. Non-200 answers are returned, not turned into errors;
/// `Err` means the request itself failed (connect, timeout, decoding).
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}
