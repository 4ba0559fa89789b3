//! Bounded parallel crawl over a card list.
//!
//! Every card is resolved in its own task, at most `workers` at a time, and
//! persisted as soon as it resolves. Results are handled in completion
//! order; one card failing never stops the batch.

use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::config::{CrawlerConfig, MAX_WORKERS};
use crate::domain::{CardTask, Resolution};
use crate::resolver::CardResolver;
use crate::store::CardSink;

/// Point-in-time view of a running crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
}

pub type ProgressObserver = Arc<dyn Fn(ProgressSnapshot) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCard {
    pub id: i64,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: Vec<SkippedCard>,
}

#[derive(Debug, Default)]
struct CrawlProgress {
    completed: usize,
    succeeded: usize,
    skipped: usize,
}

enum Outcome {
    Saved(String),
    Skipped(String),
}

pub struct CrawlDriver {
    resolver: Arc<CardResolver>,
    workers: usize,
    progress_every: usize,
    observer: ProgressObserver,
}

impl CrawlDriver {
    pub fn new(resolver: Arc<CardResolver>, config: &CrawlerConfig) -> Self {
        Self {
            resolver,
            workers: config.workers.clamp(1, MAX_WORKERS),
            progress_every: config.progress_every.max(1),
            observer: Arc::new(log_progress),
        }
    }

    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run<S>(&self, tasks: Vec<CardTask>, sink: Arc<S>) -> CrawlSummary
    where
        S: CardSink + Send + Sync + 'static,
    {
        let total = tasks.len();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let progress = Arc::new(Mutex::new(CrawlProgress::default()));

        tracing::info!("Crawling {} card(s) with {} worker(s)", total, self.workers);

        let mut pending: FuturesUnordered<_> = tasks
            .into_iter()
            .map(|task| {
                let resolver = self.resolver.clone();
                let semaphore = semaphore.clone();
                let sink = sink.clone();
                let reporter = self.reporter(progress.clone(), total);
                let (id, name) = (task.id, task.name.clone());

                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    let outcome = process_card(&resolver, sink.as_ref(), &task).await;
                    reporter.report(task.id, &task.name, &outcome);
                    outcome
                });
                async move { (id, name, handle.await) }
            })
            .collect();

        let mut summary = CrawlSummary {
            total,
            ..CrawlSummary::default()
        };

        while let Some((id, name, joined)) = pending.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Task for card #{} failed: {}", id, e);
                    let outcome = Outcome::Skipped(format!("task failed: {}", e));
                    self.reporter(progress.clone(), total)
                        .report(id, &name, &outcome);
                    outcome
                }
            };

            match outcome {
                Outcome::Saved(_) => summary.succeeded += 1,
                Outcome::Skipped(reason) => summary.skipped.push(SkippedCard { id, name, reason }),
            }
        }

        summary
    }

    fn reporter(&self, progress: Arc<Mutex<CrawlProgress>>, total: usize) -> Reporter {
        Reporter {
            progress,
            total,
            progress_every: self.progress_every,
            observer: self.observer.clone(),
        }
    }
}

/// Per-task handle on the shared progress counter.
struct Reporter {
    progress: Arc<Mutex<CrawlProgress>>,
    total: usize,
    progress_every: usize,
    observer: ProgressObserver,
}

impl Reporter {
    fn report(&self, id: i64, name: &str, outcome: &Outcome) {
        let snapshot = {
            let mut progress = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
            progress.completed += 1;
            match outcome {
                Outcome::Saved(_) => progress.succeeded += 1,
                Outcome::Skipped(_) => progress.skipped += 1,
            }
            ProgressSnapshot {
                completed: progress.completed,
                total: self.total,
                succeeded: progress.succeeded,
                skipped: progress.skipped,
            }
        };

        match outcome {
            Outcome::Saved(preview) => {
                tracing::info!("[{}/{}] ✓ {}", snapshot.completed, self.total, preview);
            }
            Outcome::Skipped(reason) => {
                tracing::warn!(
                    "[{}/{}] ⊘ Card #{}: '{}' - SKIPPED ({})",
                    snapshot.completed,
                    self.total,
                    id,
                    name,
                    reason
                );
            }
        }

        if snapshot.completed % self.progress_every == 0 || snapshot.completed == self.total {
            (self.observer)(snapshot);
        }
    }
}

async fn process_card<S: CardSink + ?Sized>(
    resolver: &CardResolver,
    sink: &S,
    task: &CardTask,
) -> Outcome {
    match resolver.resolve(task).await {
        Resolution::Found(card) => match sink.save_card(&card) {
            Ok(()) => Outcome::Saved(card.preview()),
            Err(e) => Outcome::Skipped(format!("save failed: {}", e)),
        },
        Resolution::Failed(failure) => Outcome::Skipped(failure.to_string()),
    }
}

fn log_progress(snapshot: ProgressSnapshot) {
    tracing::info!(
        "Progress: {}/{} ({} saved, {} skipped)",
        snapshot.completed,
        snapshot.total,
        snapshot.succeeded,
        snapshot.skipped
    );
}
