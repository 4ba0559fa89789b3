//! Turning a card name into a validated, extracted card record.
//!
//! A resolution first tries every candidate page identifier directly, then
//! falls back to the wiki's search page. Every fetched page must pass the
//! name match before anything is extracted from it.

mod site;

pub use site::{parse_search_results, SearchHit, WikiSite};

use std::sync::Arc;

use scraper::Html;

use crate::app::Result;
use crate::config::WikiConfig;
use crate::domain::{AttemptTrace, CardRecord, CardTask, FailureKind, Resolution, ResolutionFailure};
use crate::extractor::{page_title, FieldExtractor};
use crate::fetcher::Fetcher;
use crate::matching::{plausible_search_hit, validate};
use crate::patterns::generate_patterns;

enum PageVerdict {
    Accepted(CardRecord),
    Rejected(String),
}

pub struct CardResolver {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    site: WikiSite,
    extractor: FieldExtractor,
    max_search_results: usize,
}

impl CardResolver {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, config: &WikiConfig) -> Result<Self> {
        let site = WikiSite::new(config)?;
        let extractor = FieldExtractor::new(site.base().clone(), config.placeholder_image.clone());
        Ok(Self {
            fetcher,
            site,
            extractor,
            max_search_results: config.max_search_results,
        })
    }

    /// Resolve one card. Never errors: every way of not finding the card is
    /// reported as [`Resolution::Failed`].
    pub async fn resolve(&self, task: &CardTask) -> Resolution {
        let mut trace = AttemptTrace::default();
        let mut rejections = Vec::new();

        for pattern in generate_patterns(&task.name) {
            trace.record_pattern(&pattern);
            let url = self.site.page_url(&pattern);
            match self.try_page(&url, task).await {
                Some(PageVerdict::Accepted(card)) => return Resolution::Found(card),
                Some(PageVerdict::Rejected(reason)) => {
                    tracing::debug!(id = task.id, %url, %reason, "candidate rejected");
                    rejections.push(reason);
                }
                None => {}
            }
        }

        self.search_fallback(task, trace, rejections).await
    }

    async fn search_fallback(
        &self,
        task: &CardTask,
        mut trace: AttemptTrace,
        mut rejections: Vec<String>,
    ) -> Resolution {
        let url = self.site.search_url(&task.name);
        let response = match self.fetcher.fetch(&url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(id = task.id, error = %e, "search unavailable");
                return Resolution::Failed(ResolutionFailure {
                    kind: FailureKind::Network,
                    trace,
                    rejection: None,
                    search_status: None,
                });
            }
        };

        if !response.is_ok() {
            return give_up(trace, rejections, Some(response.status));
        }

        let hits = parse_search_results(&response.body);
        trace.search_results = Some(hits.len());

        for hit in hits.iter().take(self.max_search_results) {
            if !plausible_search_hit(&hit.title, &task.name) {
                tracing::debug!(id = task.id, title = %hit.title, "search result skipped");
                continue;
            }
            let Ok(url) = self.site.resolve_link(&hit.href) else {
                continue;
            };
            match self.try_page(url.as_str(), task).await {
                Some(PageVerdict::Accepted(card)) => return Resolution::Found(card),
                Some(PageVerdict::Rejected(reason)) => {
                    rejections.push(format!("search result '{}': {}", hit.title, reason));
                }
                None => {}
            }
        }

        give_up(trace, rejections, None)
    }

    /// `None` when the page could not be fetched or did not answer 200.
    async fn try_page(&self, url: &str, task: &CardTask) -> Option<PageVerdict> {
        match self.fetcher.fetch(url).await {
            Ok(response) if response.is_ok() => Some(self.examine(&response.body, task)),
            Ok(response) => {
                tracing::debug!(id = task.id, %url, status = response.status, "candidate miss");
                None
            }
            Err(e) => {
                tracing::debug!(id = task.id, %url, error = %e, "candidate fetch failed");
                None
            }
        }
    }

    fn examine(&self, body: &str, task: &CardTask) -> PageVerdict {
        let document = Html::parse_document(body);
        let title = page_title(&document);
        let decision = validate(title.as_deref(), &task.name);
        if decision.accepted {
            tracing::debug!(id = task.id, reason = %decision.reason, "page accepted");
            PageVerdict::Accepted(self.extractor.extract(&document, task.id, &task.name))
        } else {
            PageVerdict::Rejected(decision.reason)
        }
    }
}

/// Failure after every candidate and search result was exhausted. Reports
/// the last rejection once search results were examined, the first otherwise.
fn give_up(trace: AttemptTrace, mut rejections: Vec<String>, search_status: Option<u16>) -> Resolution {
    let kind = if rejections.is_empty() {
        FailureKind::NotFound
    } else {
        FailureKind::ValidationFailed
    };
    let rejection = match trace.search_results {
        Some(n) if n > 0 => rejections.pop(),
        _ => rejections.into_iter().next(),
    };

    Resolution::Failed(ResolutionFailure {
        kind,
        trace,
        rejection,
        search_status,
    })
}
