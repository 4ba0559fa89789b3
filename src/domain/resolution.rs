use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::CardRecord;

/// One `(id, name)` pair from the card list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTask {
    pub id: i64,
    pub name: String,
}

impl CardTask {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Verdict of comparing a fetched page title with the expected card name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDecision {
    pub accepted: bool,
    pub reason: String,
}

impl MatchDecision {
    pub fn accept(reason: impl Into<String>) -> Self {
        Self {
            accepted: true,
            reason: reason.into(),
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// No candidate page or search result validated.
    NotFound,
    /// The search endpoint could not be reached.
    Network,
    /// Pages were found but none passed the name match.
    ValidationFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::ValidationFailed => "validation failed",
        };
        f.write_str(label)
    }
}

/// How far a resolution got before giving up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTrace {
    pub patterns_tried: usize,
    /// Up to three of the tried patterns, in order.
    pub example_patterns: Vec<String>,
    /// Number of search results seen; `None` if search was never reached.
    pub search_results: Option<usize>,
}

impl AttemptTrace {
    const MAX_EXAMPLES: usize = 3;

    pub fn record_pattern(&mut self, pattern: &str) {
        self.patterns_tried += 1;
        if self.example_patterns.len() < Self::MAX_EXAMPLES {
            self.example_patterns.push(pattern.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    pub kind: FailureKind,
    pub trace: AttemptTrace,
    /// Most specific rejection reason encountered, if any page was rejected.
    pub rejection: Option<String>,
    /// Set when the search endpoint answered with something other than 200.
    pub search_status: Option<u16>,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: tried {} URL pattern(s) (e.g., {})",
            self.kind,
            self.trace.patterns_tried,
            self.trace.example_patterns.join(", ")
        )?;

        match (self.kind, self.trace.search_results) {
            (FailureKind::Network, _) => write!(f, " and search unavailable")?,
            (_, Some(0)) => write!(f, " and search returned no results")?,
            (_, Some(n)) => write!(f, " and {} search result(s), but none matched", n)?,
            (_, None) => {
                if let Some(status) = self.search_status {
                    write!(f, " and search answered HTTP {}", status)?;
                }
            }
        }

        if let Some(rejection) = &self.rejection {
            match self.trace.search_results {
                Some(n) if n > 0 => write!(f, " (last validation: {})", rejection)?,
                _ => write!(f, " (validation failed: {})", rejection)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(CardRecord),
    Failed(ResolutionFailure),
}
